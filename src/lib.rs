#![forbid(unsafe_code)]

pub mod checkpoint;
pub mod cli;
pub mod driver;
pub mod extract;
pub mod fetch;
pub mod ids;
pub mod logging;
pub mod record;
pub mod restricted;
pub mod retry;
pub mod scrape;
pub mod session;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Scrape(ScrapeArgs),
    ScrapeRestricted(ScrapeRestrictedArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Input text file with one work URL per line.
    #[arg(long)]
    pub input: String,

    /// Output directory for checkpoint files.
    #[arg(long, default_value = "output")]
    pub out: String,

    /// Base URL of the archive (must be http/https).
    #[arg(long, default_value = "https://archiveofourown.org")]
    pub base_url: String,

    /// Stop after this many works.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Fetch attempts per work before it is recorded as errored.
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Minimum pause between works (politeness).
    #[arg(long, default_value_t = 1500)]
    pub pace_min_ms: u64,

    /// Maximum pause between works (politeness).
    #[arg(long, default_value_t = 3000)]
    pub pace_max_ms: u64,

    /// Minimum pause before retrying a failed fetch.
    #[arg(long, default_value_t = 5000)]
    pub backoff_min_ms: u64,

    /// Maximum pause before retrying a failed fetch.
    #[arg(long, default_value_t = 15000)]
    pub backoff_max_ms: u64,
}

#[derive(Debug, Args)]
pub struct ScrapeRestrictedArgs {
    /// Input CSV with a `workid` column (default: `<out>/restricted_ids.csv`).
    #[arg(long)]
    pub input: Option<String>,

    /// Output directory for checkpoint files.
    #[arg(long, default_value = "output")]
    pub out: String,

    /// Base URL of the archive (must be http/https).
    #[arg(long, default_value = "https://archiveofourown.org")]
    pub base_url: String,

    /// Stop after this many works.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Fetch attempts per work before it is recorded as errored.
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Minimum pause between works (politeness).
    #[arg(long, default_value_t = 1500)]
    pub pace_min_ms: u64,

    /// Maximum pause between works (politeness).
    #[arg(long, default_value_t = 3000)]
    pub pace_max_ms: u64,

    /// Minimum pause before retrying a failed fetch.
    #[arg(long, default_value_t = 5000)]
    pub backoff_min_ms: u64,

    /// Maximum pause before retrying a failed fetch.
    #[arg(long, default_value_t = 15000)]
    pub backoff_max_ms: u64,
}

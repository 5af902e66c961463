use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    workscrape::logging::init().context("init logging")?;

    let cli = workscrape::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        workscrape::cli::Command::Scrape(args) => {
            workscrape::scrape::run(args).await.context("scrape")?;
        }
        workscrape::cli::Command::ScrapeRestricted(args) => {
            workscrape::restricted::run(args)
                .await
                .context("scrape restricted")?;
        }
    }

    Ok(())
}

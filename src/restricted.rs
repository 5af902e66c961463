use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

use crate::checkpoint::{self, RecordWriter};
use crate::cli::ScrapeRestrictedArgs;
use crate::driver;
use crate::fetch;
use crate::ids::WorkId;
use crate::retry::RetryPolicy;
use crate::session::{Credentials, Session};

pub const LOGIN_DEBUG_FILE: &str = "login_debug.html";

/// Restricted run: authenticated session over the restricted-ids checkpoint.
pub async fn run(args: ScrapeRestrictedArgs) -> anyhow::Result<()> {
    if args.max_retries == 0 {
        anyhow::bail!("--max-retries must be > 0");
    }
    let base = fetch::parse_base_url(&args.base_url)?;

    let out_dir = PathBuf::from(&args.out);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;

    let credentials = Credentials::from_env()?;

    let input_path = args
        .input
        .map(PathBuf::from)
        .unwrap_or_else(|| out_dir.join(checkpoint::RESTRICTED_IDS_FILE));
    let wanted = checkpoint::read_id_column(&input_path)?;

    let scraped_path = out_dir.join(checkpoint::SCRAPED_RESTRICTED_FILE);
    let completed = checkpoint::read_id_column(&scraped_path)?;

    let pending: Vec<WorkId> = wanted.difference(&completed).cloned().collect();
    tracing::info!(
        pending = pending.len(),
        input = %input_path.display(),
        "restricted works to scrape"
    );
    if pending.is_empty() {
        tracing::info!("nothing to scrape, skipping login");
        return Ok(());
    }

    let session = Session::login(
        &base,
        &credentials,
        Duration::from_secs(args.timeout_secs),
        &out_dir.join(LOGIN_DEBUG_FILE),
    )
    .await
    .context("log in")?;

    let mut writer = RecordWriter::open_append(&scraped_path)?;

    let policy = RetryPolicy {
        max_retries: args.max_retries,
        pace_min_ms: args.pace_min_ms,
        pace_max_ms: args.pace_max_ms,
        backoff_min_ms: args.backoff_min_ms,
        backoff_max_ms: args.backoff_max_ms,
    };
    let failures =
        driver::run_batch(&session, &base, &pending, &policy, &mut writer, args.limit).await?;

    checkpoint::write_id_list(
        &out_dir.join(checkpoint::ERRORED_RESTRICTED_IDS_FILE),
        &failures.errored,
    )?;
    if !failures.restricted.is_empty() {
        tracing::warn!(
            count = failures.restricted.len(),
            "works still restricted after login"
        );
    }

    tracing::info!(errored = failures.errored.len(), "restricted run finished");
    Ok(())
}

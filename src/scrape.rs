use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

use crate::checkpoint::{self, RecordWriter};
use crate::cli::ScrapeArgs;
use crate::driver;
use crate::fetch;
use crate::ids::{self, WorkId};
use crate::retry::RetryPolicy;
use crate::session::Session;

/// Open-works run: anonymous session over a URL list.
pub async fn run(args: ScrapeArgs) -> anyhow::Result<()> {
    if args.max_retries == 0 {
        anyhow::bail!("--max-retries must be > 0");
    }
    let base = fetch::parse_base_url(&args.base_url)?;

    let out_dir = PathBuf::from(&args.out);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("read input list: {}", args.input))?;
    let resolved = ids::resolve_lines(&input);
    tracing::info!(count = resolved.len(), "resolved work ids");

    let scraped_path = out_dir.join(checkpoint::SCRAPED_FILE);
    let completed = checkpoint::read_id_column(&scraped_path)?;
    let known_restricted =
        checkpoint::read_id_column(&out_dir.join(checkpoint::RESTRICTED_IDS_FILE))?;

    let pending: Vec<WorkId> = resolved
        .into_iter()
        .filter(|id| !completed.contains(id) && !known_restricted.contains(id))
        .collect();
    tracing::info!(
        pending = pending.len(),
        completed = completed.len(),
        restricted = known_restricted.len(),
        "filtered against checkpoints"
    );

    let session = Session::anonymous(Duration::from_secs(args.timeout_secs))
        .context("build anonymous session")?;
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
        &out_dir.join(checkpoint::RESTRICTED_IDS_FILE),
        &failures.restricted,
    )?;
    checkpoint::write_id_list(
        &out_dir.join(checkpoint::ERRORED_IDS_FILE),
        &failures.errored,
    )?;

    tracing::info!(
        restricted = failures.restricted.len(),
        errored = failures.errored.len(),
        "run finished"
    );
    Ok(())
}

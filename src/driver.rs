use url::Url;

use crate::checkpoint::RecordWriter;
use crate::extract::{self, WorkPage};
use crate::fetch::{self, FetchError};
use crate::ids::WorkId;
use crate::record::WorkRecord;
use crate::retry::{self, Outcome, RetryPolicy};
use crate::session::Session;

#[derive(Debug, Default)]
pub struct FailureLog {
    pub restricted: Vec<WorkId>,
    pub errored: Vec<WorkId>,
}

// A work's failure lands in the log and the batch continues; only a
// checkpoint write failure aborts the run.
pub async fn run_batch(
    session: &Session,
    base: &Url,
    ids: &[WorkId],
    policy: &RetryPolicy,
    writer: &mut RecordWriter,
    limit: Option<usize>,
) -> anyhow::Result<FailureLog> {
    let batch = match limit {
        Some(limit) if limit < ids.len() => {
            tracing::debug!(limit, "limiting batch");
            &ids[..limit]
        }
        _ => ids,
    };
    let total = batch.len();

    let mut failures = FailureLog::default();
    for (index, id) in batch.iter().enumerate() {
        tracing::info!("scraping {}/{}: {}", index + 1, total, id);

        let outcome = retry::run(policy, |_attempt| fetch_and_extract(session, base, id)).await;
        match outcome {
            Outcome::Completed(record) => {
                writer.append(&record)?;
                tokio::time::sleep(policy.pace()).await;
            }
            Outcome::Restricted => {
                tracing::info!(%id, "restricted, recording for the authenticated run");
                failures.restricted.push(id.clone());
            }
            Outcome::NotFound => {
                tracing::warn!(%id, "work not found, skipping");
                tokio::time::sleep(policy.pace()).await;
            }
            Outcome::Errored { attempts, error } => {
                tracing::error!(%id, attempts, %error, "giving up on work");
                failures.errored.push(id.clone());
                tokio::time::sleep(policy.pace()).await;
            }
        }
    }

    Ok(failures)
}

async fn fetch_and_extract(
    session: &Session,
    base: &Url,
    id: &WorkId,
) -> Result<WorkRecord, FetchError> {
    let body = fetch::fetch_work(session, base, id).await?;
    let page = WorkPage::parse(&body);
    let url = fetch::work_url(base, id);
    Ok(extract::extract(&page, id, &url))
}

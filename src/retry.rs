use std::future::Future;
use std::time::Duration;

use rand::Rng as _;

use crate::fetch::FetchError;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub pace_min_ms: u64,
    pub pace_max_ms: u64,
    pub backoff_min_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            pace_min_ms: 1500,
            pace_max_ms: 3000,
            backoff_min_ms: 5000,
            backoff_max_ms: 15_000,
        }
    }
}

impl RetryPolicy {
    pub fn pace(&self) -> Duration {
        sample(self.pace_min_ms, self.pace_max_ms)
    }

    pub fn backoff(&self) -> Duration {
        sample(self.backoff_min_ms, self.backoff_max_ms)
    }
}

fn sample(min_ms: u64, max_ms: u64) -> Duration {
    // Reversed bounds are swapped rather than panicking in gen_range.
    let (min_ms, max_ms) = if min_ms <= max_ms {
        (min_ms, max_ms)
    } else {
        (max_ms, min_ms)
    };
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Retry,
    Restricted,
    NotFound,
    GiveUp,
}

// `attempt` is 1-based.
pub fn decide(policy: &RetryPolicy, attempt: u32, error: &FetchError) -> Disposition {
    match error {
        FetchError::Restricted => Disposition::Restricted,
        FetchError::NotFound => Disposition::NotFound,
        _ if error.is_retriable() && attempt < policy.max_retries => Disposition::Retry,
        _ => Disposition::GiveUp,
    }
}

#[derive(Debug)]
pub enum Outcome<T> {
    Completed(T),
    Restricted,
    NotFound,
    Errored { attempts: u32, error: FetchError },
}

pub async fn run<T, F, Fut>(policy: &RetryPolicy, mut attempt_fn: F) -> Outcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1;
    loop {
        match attempt_fn(attempt).await {
            Ok(value) => return Outcome::Completed(value),
            Err(error) => match decide(policy, attempt, &error) {
                Disposition::Restricted => return Outcome::Restricted,
                Disposition::NotFound => return Outcome::NotFound,
                Disposition::GiveUp => {
                    return Outcome::Errored {
                        attempts: attempt,
                        error,
                    };
                }
                Disposition::Retry => {
                    let pause = policy.backoff();
                    tracing::warn!(
                        attempt,
                        %error,
                        pause_ms = pause.as_millis() as u64,
                        "fetch failed, backing off"
                    );
                    tokio::time::sleep(pause).await;
                    attempt += 1;
                }
            },
        }
    }
}

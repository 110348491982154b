use crate::traits::EventSink;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Fixed-interval retry schedule: a hard attempt ceiling with a constant
/// wait between attempts. No backoff, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// Final result of a retried operation plus how many attempts it took.
#[derive(Debug)]
pub struct AttemptResult<T> {
    pub outcome: Result<T>,
    pub attempts: u32,
}

/// Runs `operation` until it succeeds or the attempt ceiling is hit.
/// Every failed attempt is reported to `sink` before the next wait.
pub async fn retry_fixed<T, F, Fut>(
    policy: RetryPolicy,
    operation_name: &str,
    sink: &dyn EventSink,
    mut operation: F,
) -> AttemptResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max = policy.max_attempts.max(1);

    for attempt in 1..=max {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return AttemptResult {
                    outcome: Ok(value),
                    attempts: attempt,
                };
            }
            Err(e) => {
                sink.attempt_failed(operation_name, attempt, max, &format!("{:#}", e));

                if attempt == max {
                    return AttemptResult {
                        outcome: Err(e.context(format!(
                            "{} failed after {} attempts",
                            operation_name, max
                        ))),
                        attempts: attempt,
                    };
                }

                tokio::time::sleep(policy.interval).await;
            }
        }
    }

    unreachable!()
}

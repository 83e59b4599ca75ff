use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::warn;

use lantern_core::errors::{FailureClass, IndexError, ProviderError};

use crate::policy::{RetryDecision, RetryPolicy};

/// Errors that know their retry class.
pub trait Classify {
    fn failure_class(&self) -> FailureClass;
}

impl Classify for ProviderError {
    fn failure_class(&self) -> FailureClass {
        ProviderError::failure_class(self)
    }
}

impl Classify for IndexError {
    fn failure_class(&self) -> FailureClass {
        IndexError::failure_class(self)
    }
}

/// Drive an async operation under a retry policy.
///
/// Retries exhaust before the call site ever sees a hard failure; the
/// last error is returned verbatim once the policy gives up.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, operation: &str, mut call: F) -> Result<T, E>
where
    E: Classify + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1u32;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(error) => match policy.decide(attempt, error.failure_class()) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient failure, backing off before retry"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp => return Err(error),
            },
        }
    }
}

/// Bound a provider call by a hard timeout; an elapsed timeout is itself
/// a retryable failure class.
pub async fn timed_provider<T, Fut>(secs: u64, future: Fut) -> Result<T, ProviderError>
where
    Fut: Future<Output = Result<T, ProviderError>>,
{
    match timeout(Duration::from_secs(secs), future).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout { secs }),
    }
}

/// Bound an index call by a hard timeout.
pub async fn timed_index<T, Fut>(secs: u64, future: Fut) -> Result<T, IndexError>
where
    Fut: Future<Output = Result<T, IndexError>>,
{
    match timeout(Duration::from_secs(secs), future).await {
        Ok(result) => result,
        Err(_) => Err(IndexError::Timeout { secs }),
    }
}

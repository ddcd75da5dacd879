//! Fixed-delay retry for transient oracle overload.

use crate::RetryConfig;
use bulletin_error::RetryableError;
use std::fmt::Display;
use std::future::Future;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Run `operation`, retrying while it fails with a retryable error.
///
/// Waits `delay_ms` before each retry and gives up after `max_retries`
/// retries, returning the last error. Non-retryable errors return at once.
pub async fn retry_transient<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    let strategy = FixedInterval::from_millis(config.delay_ms).take(config.max_retries);

    Retry::spawn(strategy, || {
        let attempt = operation();
        async move {
            match attempt.await {
                Ok(value) => Ok(value),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Transient error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        }
    })
    .await
}

//! Oracle decorator that applies rate limits and overload retry.

use crate::{RateLimiter, RetryConfig, retry_transient};
use async_trait::async_trait;
use bulletin_error::OracleResult;
use bulletin_interface::{ExtractionOracle, OracleRequest, OracleResponse};
use std::sync::Arc;

/// Wraps an oracle so every call waits for quota and retries overloads.
///
/// The rate limit slot is held for one attempt only, so retries wait their
/// delay without occupying a concurrent slot.
pub struct GuardedOracle {
    inner: Arc<dyn ExtractionOracle>,
    limiter: RateLimiter,
    retry: RetryConfig,
}

impl GuardedOracle {
    /// Guard `inner` with `limiter` and `retry`.
    pub fn new(inner: Arc<dyn ExtractionOracle>, limiter: RateLimiter, retry: RetryConfig) -> Self {
        Self {
            inner,
            limiter,
            retry,
        }
    }
}

#[async_trait]
impl ExtractionOracle for GuardedOracle {
    #[tracing::instrument(skip(self, request), fields(model = %request.model()))]
    async fn generate(&self, request: &OracleRequest) -> OracleResult<OracleResponse> {
        let (inner, limiter) = (&self.inner, &self.limiter);
        retry_transient(&self.retry, move || async move {
            let _guard = limiter.acquire().await;
            inner.generate(request).await
        })
        .await
    }

    async fn available_models(&self) -> OracleResult<Vec<String>> {
        let (inner, limiter) = (&self.inner, &self.limiter);
        retry_transient(&self.retry, move || async move {
            let _guard = limiter.acquire().await;
            inner.available_models().await
        })
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

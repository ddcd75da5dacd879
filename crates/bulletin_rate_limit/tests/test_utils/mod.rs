//! Test utilities for rate limit tests.

use async_trait::async_trait;
use bulletin_core::TokenUsage;
use bulletin_error::{OracleError, OracleErrorKind, OracleResult};
use bulletin_interface::{ExtractionOracle, OracleRequest, OracleResponse};
use std::sync::{Arc, Mutex};

/// Oracle that fails a fixed number of times before succeeding.
pub struct MockOracle {
    fail_count: usize,
    error: OracleErrorKind,
    success_text: String,
    call_count: Arc<Mutex<usize>>,
}

impl MockOracle {
    /// Fail `fail_count` times with `error`, then answer `success_text`.
    pub fn fail_then_succeed(
        fail_count: usize,
        error: OracleErrorKind,
        success_text: impl Into<String>,
    ) -> Self {
        Self {
            fail_count,
            error,
            success_text: success_text.into(),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn next_response(&self) -> OracleResult<OracleResponse> {
        let mut count = self.call_count.lock().unwrap();
        let current = *count;
        *count += 1;

        if current < self.fail_count {
            Err(OracleError::new(self.error.clone()))
        } else {
            Ok(OracleResponse {
                text: self.success_text.clone(),
                usage: TokenUsage::new(10, 5, 15),
            })
        }
    }
}

#[async_trait]
impl ExtractionOracle for MockOracle {
    async fn generate(&self, _request: &OracleRequest) -> OracleResult<OracleResponse> {
        self.next_response()
    }

    async fn available_models(&self) -> OracleResult<Vec<String>> {
        self.next_response().map(|_| vec!["models/mock".to_string()])
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An overload error as the provider reports it.
pub fn overloaded() -> OracleErrorKind {
    OracleErrorKind::Overloaded {
        status_code: 503,
        message: "The model is overloaded. Please try again later.".to_string(),
    }
}

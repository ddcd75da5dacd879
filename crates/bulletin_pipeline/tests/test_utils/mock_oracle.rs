//! Scripted extraction oracle.

use async_trait::async_trait;
use bulletin_core::TokenUsage;
use bulletin_error::OracleResult;
use bulletin_interface::{ExtractionOracle, OracleRequest, OracleResponse};
use std::sync::{Arc, Mutex};

/// Usage reported for every successful call.
pub const MOCK_USAGE: TokenUsage = TokenUsage {
    prompt: 10,
    candidates: 5,
    total: 15,
};

type Responder = dyn Fn(&OracleRequest) -> OracleResult<String> + Send + Sync;

/// Oracle that answers each request with a caller-supplied function.
pub struct ScriptedOracle {
    responder: Box<Responder>,
    models: Vec<String>,
    requests: Arc<Mutex<Vec<OracleRequest>>>,
}

impl ScriptedOracle {
    /// Answer every request with `responder`.
    pub fn new(
        responder: impl Fn(&OracleRequest) -> OracleResult<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            models: vec![
                "models/gemini-2.5-flash-lite".to_string(),
                "models/gemini-2.5-flash".to_string(),
                "models/gemini-2.5-flash-image".to_string(),
            ],
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer `text`.
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Replace the advertised model list.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ExtractionOracle for ScriptedOracle {
    async fn generate(&self, request: &OracleRequest) -> OracleResult<OracleResponse> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request).map(|text| OracleResponse {
            text,
            usage: MOCK_USAGE,
        })
    }

    async fn available_models(&self) -> OracleResult<Vec<String>> {
        Ok(self.models.clone())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

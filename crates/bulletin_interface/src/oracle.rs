//! Oracle requests, responses and typed helpers.

use crate::{ExtractionOracle, response_schema};
use bulletin_core::TokenUsage;
use bulletin_error::{OracleError, OracleErrorKind, OracleResult};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One prompt sent to the oracle.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct OracleRequest {
    /// Model identifier
    model: String,
    /// Prompt text
    prompt: String,
    /// JSON schema the response must follow; free text when absent
    schema: Option<Value>,
}

impl OracleRequest {
    /// A free-text request.
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            schema: None,
        }
    }

    /// A request constrained to `schema`.
    pub fn structured(model: impl Into<String>, prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            schema: Some(schema),
        }
    }
}

/// Raw oracle output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OracleResponse {
    /// Response text; JSON when a schema was given
    pub text: String,
    /// Tokens consumed by the call
    pub usage: TokenUsage,
}

/// A decoded oracle value with the tokens it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    /// Decoded value
    pub value: T,
    /// Tokens consumed by the call
    pub usage: TokenUsage,
}

/// Ask the oracle for a `T`, deriving the response schema from the type.
pub async fn extract<T>(
    oracle: &dyn ExtractionOracle,
    model: &str,
    prompt: String,
) -> OracleResult<Extracted<T>>
where
    T: JsonSchema + DeserializeOwned,
{
    let schema = response_schema::<T>()
        .map_err(|e| OracleError::new(OracleErrorKind::InvalidResponse(e.to_string())))?;
    let response = oracle
        .generate(&OracleRequest::structured(model, prompt, schema))
        .await?;
    let value = serde_json::from_str(&response.text)
        .map_err(|e| OracleError::new(OracleErrorKind::InvalidResponse(e.to_string())))?;
    Ok(Extracted {
        value,
        usage: response.usage,
    })
}

/// Ask the oracle for free text.
pub async fn generate_text(
    oracle: &dyn ExtractionOracle,
    model: &str,
    prompt: String,
) -> OracleResult<Extracted<String>> {
    let response = oracle.generate(&OracleRequest::text(model, prompt)).await?;
    Ok(Extracted {
        value: response.text,
        usage: response.usage,
    })
}

//! Rate limit and retry settings.

use serde::{Deserialize, Serialize};

/// Provider quota limits. `None` means unlimited.
///
/// ```toml
/// [oracle.limits]
/// rpm = 15
/// max_concurrent = 8
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct LimitConfig {
    /// Requests per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Maximum concurrent requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Overload retry policy: a fixed delay between a bounded number of retries.
///
/// ```toml
/// [oracle.retry]
/// delay_ms = 5000
/// max_retries = 5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Delay before each retry in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_delay_ms() -> u64 {
    5000
}

fn default_max_retries() -> usize {
    5
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_retries: default_max_retries(),
        }
    }
}

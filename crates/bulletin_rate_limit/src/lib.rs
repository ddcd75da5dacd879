//! Rate limiting and overload retry for oracle calls.
//!
//! Oracle calls pass through two guards:
//! - [`RateLimiter`] keeps requests within the provider's per-minute and
//!   concurrency quotas (governor GCRA plus a Tokio semaphore)
//! - [`retry_transient`] retries overload errors with a fixed delay and a
//!   bounded number of attempts
//!
//! [`GuardedOracle`] applies both to any [`bulletin_interface::ExtractionOracle`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod guarded;
mod limiter;
mod retry;

pub use config::{LimitConfig, RetryConfig};
pub use guarded::GuardedOracle;
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use retry::retry_transient;

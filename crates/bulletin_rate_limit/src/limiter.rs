//! Rate limiter built on governor and a Tokio semaphore.

use crate::LimitConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Enforces requests-per-minute and concurrent-request limits.
///
/// Clones share the same quotas.
#[derive(Clone)]
pub struct RateLimiter {
    // RPM limiter (requests per minute)
    rpm_limiter: Option<Arc<DirectRateLimiter>>,

    // Concurrent request semaphore
    concurrent_semaphore: Arc<Semaphore>,
}

impl RateLimiter {
    /// Create a limiter from configured limits.
    pub fn new(limits: &LimitConfig) -> Self {
        let rpm_limiter = limits.rpm.and_then(|rpm| {
            NonZeroU32::new(rpm).map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))))
        });

        let max_concurrent = limits
            .max_concurrent
            .map(|n| n as usize)
            .unwrap_or(Semaphore::MAX_PERMITS);
        let concurrent_semaphore = Arc::new(Semaphore::new(max_concurrent));

        Self {
            rpm_limiter,
            concurrent_semaphore,
        }
    }

    /// A limiter that never blocks.
    pub fn unlimited() -> Self {
        Self::new(&LimitConfig::default())
    }

    /// Wait until a request is allowed.
    ///
    /// Returns a guard that releases the concurrent slot when dropped.
    pub async fn acquire(&self) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        // The semaphore is never closed, so a permit is always granted.
        let permit = self.concurrent_semaphore.clone().acquire_owned().await.ok();

        RateLimiterGuard { _permit: permit }
    }

    /// Concurrent slots currently free.
    pub fn available_permits(&self) -> usize {
        self.concurrent_semaphore.available_permits()
    }
}

/// RAII guard for a concurrent request slot.
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}

//! Page fetcher serving canned pages.

use async_trait::async_trait;
use bulletin_error::FetchError;
use bulletin_interface::PageFetcher;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct Page {
    body: Result<String, String>,
    delay: Duration,
}

/// Fetcher that serves registered pages, each after an optional delay.
///
/// Unregistered URLs fail with "HTTP 404".
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, Page>,
    fetched: Arc<Mutex<Vec<(String, bool)>>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFetcher {
    /// Serve `body` at `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_slow_page(url, body, Duration::ZERO)
    }

    /// Serve `body` at `url` after `delay`.
    pub fn with_slow_page(
        mut self,
        url: impl Into<String>,
        body: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.pages.insert(
            url.into(),
            Page {
                body: Ok(body.into()),
                delay,
            },
        );
        self
    }

    /// Fail fetches of `url` with `message`.
    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.pages.insert(
            url.into(),
            Page {
                body: Err(message.into()),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// URLs fetched and their dynamic render flag, in call order.
    pub fn fetched(&self) -> Vec<(String, bool)> {
        self.fetched.lock().unwrap().clone()
    }

    /// Most fetches that were in progress at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn serve(&self, url: &str) -> Result<String, FetchError> {
        let Some(page) = self.pages.get(url).cloned() else {
            return Err(FetchError::new(url, "HTTP 404"));
        };
        if !page.delay.is_zero() {
            tokio::time::sleep(page.delay).await;
        }
        page.body.map_err(|message| FetchError::new(url, message))
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_simplified(
        &self,
        url: &str,
        use_dynamic_render: bool,
    ) -> Result<String, FetchError> {
        self.fetched
            .lock()
            .unwrap()
            .push((url.to_string(), use_dynamic_render));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        let result = self.serve(url).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

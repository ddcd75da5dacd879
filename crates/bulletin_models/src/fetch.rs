//! Page retrieval and simplification.
//!
//! Pages are fetched over plain HTTP, or dumped from a headless browser when a
//! target builds its content with script. Either way the `<body>` is reduced to
//! markdown without scripts or images before it reaches the oracle.

use async_trait::async_trait;
use bulletin_error::FetchError;
use bulletin_interface::PageFetcher;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, instrument};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Fetches pages with reqwest, or a headless browser for dynamic pages.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    browser: String,
}

impl HttpPageFetcher {
    /// Creates a fetcher that renders dynamic pages with `browser`.
    ///
    /// `browser` is a Chromium-compatible executable accepting
    /// `--headless --dump-dom`.
    pub fn new(browser: impl Into<String>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::new("", format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            browser: browser.into(),
        })
    }

    async fn fetch_static(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::new(url, format!("Failed to read body: {}", e)))
    }

    async fn fetch_rendered(&self, url: &str) -> Result<String, FetchError> {
        let output = tokio::process::Command::new(&self.browser)
            .args(["--headless", "--disable-gpu", "--dump-dom", url])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| FetchError::new(url, format!("Failed to start {}: {}", self.browser, e)))?;

        if !output.status.success() {
            return Err(FetchError::new(
                url,
                format!(
                    "{} exited with {}: {}",
                    self.browser,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(skip(self))]
    async fn fetch_simplified(
        &self,
        url: &str,
        use_dynamic_render: bool,
    ) -> Result<String, FetchError> {
        let html = if use_dynamic_render {
            self.fetch_rendered(url).await?
        } else {
            self.fetch_static(url).await?
        };

        let simplified = simplify_html(&html).map_err(|e| FetchError::new(url, e))?;
        info!(
            original = html.len(),
            simplified = simplified.len(),
            use_dynamic_render,
            "Simplified page"
        );
        Ok(simplified)
    }
}

/// Reduces an HTML document to markdown of its body.
///
/// Scripts, styles and images are dropped. A document without a body yields
/// an empty string.
///
/// # Examples
///
/// ```
/// use bulletin_models::simplify_html;
///
/// let md = simplify_html("<html><body><h1>Fair</h1><script>x()</script></body></html>").unwrap();
/// assert_eq!(md.trim(), "# Fair");
/// ```
pub fn simplify_html(html: &str) -> Result<String, String> {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").map_err(|e| e.to_string())?;
    let Some(body) = document.select(&body_selector).next() else {
        return Ok(String::new());
    };

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript", "img"])
        .build();
    converter
        .convert(&body.inner_html())
        .map_err(|e| format!("Markdown conversion failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_and_images_removed() {
        let html = r#"<html><head><title>T</title></head><body>
            <p>Story hour</p>
            <img src="/banner.png" alt="banner">
            <script>track();</script>
            <a href="/events/42">Details</a>
        </body></html>"#;
        let md = simplify_html(html).unwrap();
        assert!(md.contains("Story hour"));
        assert!(md.contains("[Details](/events/42)"));
        assert!(!md.contains("track()"));
        assert!(!md.contains("banner"));
    }

    #[test]
    fn test_head_content_excluded() {
        let md = simplify_html("<html><head><title>Hidden</title></head><body>Shown</body></html>")
            .unwrap();
        assert!(md.contains("Shown"));
        assert!(!md.contains("Hidden"));
    }

    #[tokio::test]
    async fn test_missing_browser_is_fetch_error() {
        let fetcher = HttpPageFetcher::new("/nonexistent/browser-binary").unwrap();
        let err = fetcher
            .fetch_simplified("https://example.org", true)
            .await
            .unwrap_err();
        assert_eq!(err.url, "https://example.org");
        assert!(err.message.contains("Failed to start"));
    }
}

//! Discovery crawler: turns one target into event records.
//!
//! The event-list strategy extracts records from the seed page, then enriches
//! every record that has a link by re-querying the oracle with the record's
//! own page. Enrichment runs on a bounded pool and keeps input order.

use crate::prompts::{self, render};
use bulletin_core::{
    CrawlStrategy, DateRange, EventsResult, ExtractedRecord, Target, TokenUsage, american_date,
};
use bulletin_error::{BulletinResult, FetchError};
use bulletin_interface::{ExtractionOracle, PageFetcher, extract};
use futures::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// What one target's crawl produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrawlOutcome {
    /// Extracted records, in seed page order
    pub records: Vec<ExtractedRecord>,
    /// Candidate follow-links, absolute, without `mailto:` links
    pub follow_links: Vec<String>,
    /// Tokens spent on the seed call and every enrichment call
    pub usage: TokenUsage,
}

/// Makes a root-relative link absolute against `base`.
///
/// Only links starting with a single `/` are rewritten; everything else is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use bulletin_pipeline::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("https://x.org/calendar?page=2").unwrap();
/// assert_eq!(normalize_link(&base, "/events/5"), "https://x.org/events/5");
/// assert_eq!(normalize_link(&base, "https://y.org/a"), "https://y.org/a");
/// ```
pub fn normalize_link(base: &Url, link: &str) -> String {
    if link.starts_with('/') && !link.starts_with("//") {
        format!("{}{}", base.origin().ascii_serialization(), link)
    } else {
        link.to_string()
    }
}

fn is_mailto(link: &str) -> bool {
    link.trim_start().to_ascii_lowercase().starts_with("mailto:")
}

/// Crawls targets with a fetcher and an oracle.
pub struct Crawler<'a> {
    oracle: &'a dyn ExtractionOracle,
    fetcher: &'a dyn PageFetcher,
    model: &'a str,
    workers: usize,
}

impl<'a> Crawler<'a> {
    /// Creates a crawler running up to `workers` enrichments at once.
    pub fn new(
        oracle: &'a dyn ExtractionOracle,
        fetcher: &'a dyn PageFetcher,
        model: &'a str,
        workers: usize,
    ) -> Self {
        Self {
            oracle,
            fetcher,
            model,
            workers: workers.max(1),
        }
    }

    /// Crawls one target over `range`.
    ///
    /// # Errors
    ///
    /// `TargetConfigInvalid` for an unknown agent or URL template, and a
    /// `FetchError` when the seed page cannot be retrieved. An oracle failure
    /// on the seed page yields an empty outcome instead.
    #[instrument(skip(self, target, range), fields(target = %target.name()))]
    pub async fn crawl(&self, target: &Target, range: &DateRange) -> BulletinResult<CrawlOutcome> {
        let mut outcome = match target.strategy()? {
            CrawlStrategy::EventList => self.crawl_event_list(target, range).await?,
            CrawlStrategy::FlatEventPage => self.crawl_flat_page(target, range).await?,
        };

        for record in &mut outcome.records {
            record.organization = target.organization().clone();
        }

        info!(
            records = outcome.records.len(),
            follow_links = outcome.follow_links.len(),
            total_tokens = outcome.usage.total,
            "Crawled target"
        );
        Ok(outcome)
    }

    async fn crawl_event_list(
        &self,
        target: &Target,
        range: &DateRange,
    ) -> BulletinResult<CrawlOutcome> {
        let url = target.seed_url(range)?;
        let base = parse_base(&url)?;
        let page = self
            .fetcher
            .fetch_simplified(&url, target.use_dynamic_render())
            .await?;

        let start_date = american_date(*range.start());
        let finish_date = american_date(*range.finish());
        let prompt = render(
            prompts::EVENT_LIST_START,
            &[
                ("start_date", start_date.as_str()),
                ("finish_date", finish_date.as_str()),
                ("page", page.as_str()),
            ],
        );

        let Some((result, mut usage)) = self.extract_events(&url, prompt).await else {
            return Ok(CrawlOutcome::default());
        };

        let records: Vec<ExtractedRecord> = result
            .events
            .into_iter()
            .map(|mut record| {
                record.link = record.link.map(|link| normalize_link(&base, &link));
                record
            })
            .collect();
        let follow_links = follow_links(&base, &result.other_urls);

        let enriched: Vec<(ExtractedRecord, TokenUsage)> = stream::iter(records)
            .map(|record| {
                self.enrich(record, target.use_dynamic_render(), &start_date, &finish_date)
            })
            .buffered(self.workers)
            .collect()
            .await;

        let mut records = Vec::with_capacity(enriched.len());
        for (record, cost) in enriched {
            usage += cost;
            records.push(record);
        }

        Ok(CrawlOutcome {
            records,
            follow_links,
            usage,
        })
    }

    async fn crawl_flat_page(
        &self,
        target: &Target,
        range: &DateRange,
    ) -> BulletinResult<CrawlOutcome> {
        let url = target.url().clone();
        let base = parse_base(&url)?;
        let page = self
            .fetcher
            .fetch_simplified(&url, target.use_dynamic_render())
            .await?;

        let today = range.start().format("%Y-%m-%d").to_string();
        let finish = range.finish().format("%Y-%m-%d").to_string();
        let year = range.start().format("%Y").to_string();
        let prompt = render(
            prompts::FLAT_EVENTS,
            &[
                ("today", today.as_str()),
                ("start_date", today.as_str()),
                ("finish_date", finish.as_str()),
                ("year", year.as_str()),
                ("link", url.as_str()),
                ("page", page.as_str()),
            ],
        );

        let Some((result, usage)) = self.extract_events(&url, prompt).await else {
            return Ok(CrawlOutcome::default());
        };

        let records = result
            .events
            .into_iter()
            .map(|mut record| {
                record.link = record.link.map(|link| normalize_link(&base, &link));
                record
            })
            .collect();

        Ok(CrawlOutcome {
            records,
            follow_links: follow_links(&base, &result.other_urls),
            usage,
        })
    }

    async fn extract_events(&self, url: &str, prompt: String) -> Option<(EventsResult, TokenUsage)> {
        match extract::<EventsResult>(self.oracle, self.model, prompt).await {
            Ok(extracted) => Some((extracted.value, extracted.usage)),
            Err(e) => {
                warn!(url = %url, error = %e, "Event extraction failed, no records from this page");
                None
            }
        }
    }

    /// Re-extracts one record from its own page.
    ///
    /// Any failure returns the record unchanged with zero cost.
    async fn enrich(
        &self,
        record: ExtractedRecord,
        use_dynamic_render: bool,
        start_date: &str,
        finish_date: &str,
    ) -> (ExtractedRecord, TokenUsage) {
        let Some(link) = record.link.clone().filter(|link| !is_mailto(link)) else {
            return (record, TokenUsage::default());
        };

        let page = match self.fetcher.fetch_simplified(&link, use_dynamic_render).await {
            Ok(page) => page,
            Err(e) => {
                warn!(link = %link, error = %e, "Enrichment fetch failed, keeping record");
                return (record, TokenUsage::default());
            }
        };

        let event = match serde_json::to_string(&record) {
            Ok(event) => event,
            Err(e) => {
                warn!(link = %link, error = %e, "Could not encode record, keeping it");
                return (record, TokenUsage::default());
            }
        };
        let prompt = render(
            prompts::EVENT_LIST_UPDATE,
            &[
                ("event", event.as_str()),
                ("page", page.as_str()),
                ("start_date", start_date),
                ("finish_date", finish_date),
            ],
        );

        match extract::<ExtractedRecord>(self.oracle, self.model, prompt).await {
            Ok(extracted) => {
                debug!(link = %link, "Enriched record");
                let mut updated = extracted.value;
                if updated.link.is_none() {
                    updated.link = record.link;
                }
                (updated, extracted.usage)
            }
            Err(e) => {
                warn!(link = %link, error = %e, "Enrichment extraction failed, keeping record");
                (record, TokenUsage::default())
            }
        }
    }
}

fn parse_base(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| FetchError::new(url, format!("Invalid URL: {}", e)))
}

fn follow_links(base: &Url, links: &[String]) -> Vec<String> {
    links
        .iter()
        .filter(|link| !is_mailto(link))
        .map(|link| normalize_link(base, link))
        .collect()
}

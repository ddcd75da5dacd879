//! Discovery targets and crawl strategies.

use crate::DateRange;
use bulletin_error::{PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a target's seed page is turned into records.
///
/// # Examples
///
/// ```
/// use bulletin_core::CrawlStrategy;
/// use std::str::FromStr;
///
/// assert_eq!(CrawlStrategy::from_str("EventListAgent").unwrap(), CrawlStrategy::EventList);
/// assert!(CrawlStrategy::from_str("SpiderAgent").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    Serialize,
    Deserialize,
)]
pub enum CrawlStrategy {
    /// Seed page lists events; each event link is followed for enrichment
    #[strum(serialize = "EventListAgent")]
    #[serde(rename = "EventListAgent")]
    EventList,
    /// Seed page holds all event details; no links are followed
    #[strum(serialize = "FlatEventPageAgent")]
    #[serde(rename = "FlatEventPageAgent")]
    FlatEventPage,
}

/// A configured discovery source.
///
/// Targets are read from the `[targets.<name>]` tables of the configuration
/// file; the table key becomes the target name.
///
/// # Examples
///
/// ```
/// use bulletin_core::TargetBuilder;
///
/// let target = TargetBuilder::default()
///     .name("library")
///     .agent("EventListAgent")
///     .url("https://library.example.org/events")
///     .organization("Public Library")
///     .build()
///     .unwrap();
/// assert_eq!(target.name(), "library");
/// assert!(!target.use_dynamic_render());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Target {
    /// Unique target name
    #[serde(default)]
    name: String,
    /// Crawl strategy name as written in configuration
    agent: String,
    /// Seed URL
    url: String,
    /// Organization credited on every record from this target
    organization: String,
    /// Render the page in a headless browser before simplifying
    #[serde(default, alias = "use_selenium")]
    #[builder(default)]
    #[getter(skip)]
    use_dynamic_render: bool,
    /// Query-string template with `{events_start}` / `{events_finish}` placeholders
    #[serde(default)]
    #[builder(default)]
    url_params: Option<String>,
}

const PLACEHOLDERS: [&str; 2] = ["{events_start}", "{events_finish}"];

impl Target {
    /// Whether the seed page needs a headless browser render.
    pub fn use_dynamic_render(&self) -> bool {
        self.use_dynamic_render
    }

    /// Returns this target renamed to `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parses the configured agent into a crawl strategy.
    #[track_caller]
    pub fn strategy(&self) -> Result<CrawlStrategy, PipelineError> {
        CrawlStrategy::from_str(&self.agent).map_err(|_| {
            PipelineError::new(PipelineErrorKind::TargetConfigInvalid {
                target: self.name.clone(),
                reason: format!("unknown agent kind '{}'", self.agent),
            })
        })
    }

    /// Builds the seed URL with the date range bound into the parameter template.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulletin_core::{DateRange, TargetBuilder};
    /// use chrono::NaiveDate;
    ///
    /// let target = TargetBuilder::default()
    ///     .name("center")
    ///     .agent("EventListAgent")
    ///     .url("https://x.org/calendar")
    ///     .organization("Center")
    ///     .url_params(Some("start={events_start}&end={events_finish}".to_string()))
    ///     .build()
    ///     .unwrap();
    /// let range = DateRange::month_from(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    /// assert_eq!(
    ///     target.seed_url(&range).unwrap(),
    ///     "https://x.org/calendar?start=2026-10-16&end=2026-11-16"
    /// );
    /// ```
    #[track_caller]
    pub fn seed_url(&self, range: &DateRange) -> Result<String, PipelineError> {
        let Some(template) = &self.url_params else {
            return Ok(self.url.clone());
        };

        if let Some(unknown) = placeholders(template).find(|p| !PLACEHOLDERS.contains(p)) {
            return Err(PipelineError::new(PipelineErrorKind::TargetConfigInvalid {
                target: self.name.clone(),
                reason: format!("unknown placeholder {} in url_params '{}'", unknown, template),
            }));
        }

        let bound = template
            .replace(PLACEHOLDERS[0], &range.start().format("%Y-%m-%d").to_string())
            .replace(PLACEHOLDERS[1], &range.finish().format("%Y-%m-%d").to_string());

        let separator = if self.url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.url, separator, bound))
    }
}

/// `{name}` tokens in a template. Braces around anything other than an
/// identifier are literal text.
fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    template.match_indices('{').filter_map(move |(start, _)| {
        let rest = &template[start + 1..];
        let end = rest.find('}')?;
        let name = &rest[..end];
        let is_ident = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        is_ident.then(|| &template[start..start + end + 2])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn target(agent: &str, params: Option<&str>) -> Target {
        TargetBuilder::default()
            .name("t")
            .agent(agent)
            .url("https://x.org/events")
            .organization("X")
            .url_params(params.map(str::to_string))
            .build()
            .unwrap()
    }

    fn range() -> DateRange {
        DateRange::month_from(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap())
    }

    #[test]
    fn test_unknown_agent_is_invalid() {
        let err = target("SitemapAgent", None).strategy().unwrap_err();
        assert!(matches!(
            err.kind,
            PipelineErrorKind::TargetConfigInvalid { .. }
        ));
    }

    #[test]
    fn test_seed_url_without_template() {
        assert_eq!(
            target("EventListAgent", None).seed_url(&range()).unwrap(),
            "https://x.org/events"
        );
    }

    #[test]
    fn test_seed_url_unknown_placeholder() {
        let t = target("EventListAgent", Some("from={events_begin}"));
        assert!(t.seed_url(&range()).is_err());
    }

    #[test]
    fn test_seed_url_keeps_literal_braces() {
        let t = target(
            "EventListAgent",
            Some("start={events_start}&filter={\"type\":\"music\"}"),
        );
        assert_eq!(
            t.seed_url(&range()).unwrap(),
            "https://x.org/events?start=2026-01-31&filter={\"type\":\"music\"}"
        );
    }

    #[test]
    fn test_placeholders_found() {
        let found: Vec<&str> = placeholders("a={events_start}&b={}&c={x y}&d={events_begin}").collect();
        assert_eq!(found, vec!["{events_start}", "{events_begin}"]);
    }

    #[test]
    fn test_seed_url_month_end_clamps() {
        let t = target("EventListAgent", Some("to={events_finish}"));
        assert_eq!(
            t.seed_url(&range()).unwrap(),
            "https://x.org/events?to=2026-02-28"
        );
    }

    #[test]
    fn test_deserialize_selenium_alias() {
        let t: Target = serde_json::from_str(
            r#"{"agent":"FlatEventPageAgent","url":"u","organization":"o","use_selenium":true}"#,
        )
        .unwrap();
        assert!(t.use_dynamic_render());
        assert_eq!(t.strategy().unwrap(), CrawlStrategy::FlatEventPage);
    }
}

//! Read-only capability surface over one loaded page.
//!
//! Checks never inject free-form scripts; they go through the named operations of
//! [`PageHandle`]. Two implementations exist:
//!
//! - [`crate::browser::PageSession`] - a live Chromium page driven over CDP
//! - [`StaticPage`] - an HTML document held in memory, for offline audits and tests

mod static_page;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use static_page::{StaticPage, StaticPageProvider};

/// Immutable snapshot of one element, taken at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub tag: String,
    pub text: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub outer_html: String,
}

impl ElementSnapshot {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Millisecond timestamps from the Navigation Timing API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub load_event_end: f64,
}

impl NavigationTiming {
    /// Seconds between navigation start and the end of the load event, if the load finished.
    pub fn load_seconds(&self) -> Option<f64> {
        if self.load_event_end <= 0.0 || self.load_event_end < self.navigation_start {
            return None;
        }
        Some((self.load_event_end - self.navigation_start) / 1000.0)
    }
}

/// One entry of `performance.getEntriesByType('resource')`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    pub name: String,
    pub start_time: f64,
    pub request_start: f64,
}

#[async_trait]
pub trait PageHandle: Send + Sync {
    /// The document title, empty when the page has none.
    async fn title(&self) -> Result<String>;

    /// All elements matching a CSS selector, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>>;

    async fn query_one(&self, selector: &str) -> Result<Option<ElementSnapshot>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn count(&self, selector: &str) -> Result<usize>;

    async fn count_all_elements(&self) -> Result<usize> {
        self.count("*").await
    }

    /// Serialized document, doctype included.
    async fn content(&self) -> Result<String>;

    /// Header of the main navigation response, matched case-insensitively.
    fn response_header(&self, name: &str) -> Option<String>;

    async fn navigation_timing(&self) -> Result<NavigationTiming>;

    async fn resource_timings(&self) -> Result<Vec<ResourceTiming>>;

    /// Computed style property of the first element matching `selector`.
    /// `None` when the property is not exposed by the engine.
    async fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>>;

    async fn viewport_meta_content(&self) -> Result<Option<String>> {
        Ok(self
            .query_one(r#"meta[name="viewport"]"#)
            .await?
            .and_then(|meta| meta.attr("content").map(str::to_string)))
    }

    /// `href` of every linked stylesheet, in document order.
    async fn stylesheet_hrefs(&self) -> Result<Vec<String>>;

    /// Whether any rule of the stylesheet at `href` mentions `@media`.
    /// Errors when the rules cannot be read (e.g. cross-origin sheets).
    async fn stylesheet_has_media_query(&self, href: &str) -> Result<bool>;
}

/// A page that owns resources and must be released once the audit finishes.
#[async_trait]
pub trait OpenPage: PageHandle {
    fn handle(&self) -> &dyn PageHandle;

    /// Release every resource behind the page. Safe to call more than once.
    async fn close(&mut self) -> Result<()>;
}

/// Opens one page per audit.
#[async_trait]
pub trait PageProvider: Send + Sync {
    async fn open(&self, target: &crate::AuditTarget) -> Result<Box<dyn OpenPage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_seconds_uses_millisecond_delta() {
        let timing = NavigationTiming {
            navigation_start: 1_700_000_000_000.0,
            load_event_end: 1_700_000_001_250.0,
        };
        assert_eq!(timing.load_seconds(), Some(1.25));
    }

    #[test]
    fn load_seconds_is_none_before_load_finishes() {
        let timing = NavigationTiming {
            navigation_start: 1_700_000_000_000.0,
            load_event_end: 0.0,
        };
        assert_eq!(timing.load_seconds(), None);
    }

    #[test]
    fn element_snapshot_deserializes_from_page_json() {
        let raw = r#"{"tag":"a","text":"Docs","attributes":{"href":"/docs"},"outerHtml":"<a href=\"/docs\">Docs</a>"}"#;
        let el: ElementSnapshot = serde_json::from_str(raw).expect("parse snapshot");
        assert_eq!(el.attr("href"), Some("/docs"));
        assert_eq!(el.attr("rel"), None);
        assert_eq!(el.outer_html, "<a href=\"/docs\">Docs</a>");
    }
}

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{
    ElementSnapshot, NavigationTiming, OpenPage, PageHandle, PageProvider, ResourceTiming,
};
use crate::{AuditError, AuditTarget, Result};

/// A [`PageHandle`] over HTML held in memory.
///
/// There is no layout or script engine behind it: computed styles and timings
/// only exist when supplied through the builder methods.
/// The document is re-parsed on each query because parsed trees are not `Send`.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    html: String,
    headers: BTreeMap<String, String>,
    navigation_timing: Option<NavigationTiming>,
    resource_timings: Vec<ResourceTiming>,
    stylesheets: BTreeMap<String, String>,
    computed_styles: BTreeMap<(String, String), String>,
    failing_selectors: BTreeSet<String>,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_navigation_timing(mut self, timing: NavigationTiming) -> Self {
        self.navigation_timing = Some(timing);
        self
    }

    pub fn with_resource_timings(mut self, timings: Vec<ResourceTiming>) -> Self {
        self.resource_timings = timings;
        self
    }

    /// Make the stylesheet at `href` readable with the given CSS text.
    /// Linked sheets without registered text behave like cross-origin sheets.
    pub fn with_stylesheet(mut self, href: impl Into<String>, css: impl Into<String>) -> Self {
        self.stylesheets.insert(href.into(), css.into());
        self
    }

    /// Report `value` as the computed `property` of the element matching `selector`.
    pub fn with_computed_style(
        mut self,
        selector: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.computed_styles
            .insert((selector.into(), property.into()), value.into());
        self
    }

    /// Make every query for `selector` fail, as a broken DOM query would.
    pub fn with_failing_selector(mut self, selector: impl Into<String>) -> Self {
        self.failing_selectors.insert(selector.into());
        self
    }

    fn selector(&self, selector: &str) -> Result<Selector> {
        if self.failing_selectors.contains(selector) {
            return Err(AuditError::page(format!("query for '{selector}' failed")));
        }
        Selector::parse(selector)
            .map_err(|e| AuditError::page(format!("invalid selector '{selector}': {e:?}")))
    }
}

fn snapshot(element: ElementRef<'_>) -> ElementSnapshot {
    ElementSnapshot {
        tag: element.value().name().to_string(),
        text: element.text().collect(),
        attributes: element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        outer_html: element.html(),
    }
}

#[async_trait]
impl PageHandle for StaticPage {
    async fn title(&self) -> Result<String> {
        let selector = self.selector("title")?;
        let document = Html::parse_document(&self.html);
        let title = document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        Ok(title.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let selector = self.selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(document.select(&selector).map(snapshot).collect())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let selector = self.selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(document.select(&selector).count())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    fn response_header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_ascii_lowercase()).cloned()
    }

    async fn navigation_timing(&self) -> Result<NavigationTiming> {
        self.navigation_timing
            .ok_or_else(|| AuditError::page("navigation timing is not available for static pages"))
    }

    async fn resource_timings(&self) -> Result<Vec<ResourceTiming>> {
        Ok(self.resource_timings.clone())
    }

    async fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        self.selector(selector)?;
        Ok(self
            .computed_styles
            .get(&(selector.to_string(), property.to_string()))
            .cloned())
    }

    async fn stylesheet_hrefs(&self) -> Result<Vec<String>> {
        Ok(self
            .query_all(r#"link[rel~="stylesheet"][href]"#)
            .await?
            .into_iter()
            .filter_map(|link| link.attr("href").map(str::to_string))
            .collect())
    }

    async fn stylesheet_has_media_query(&self, href: &str) -> Result<bool> {
        self.stylesheets
            .get(href)
            .map(|css| css.contains("@media"))
            .ok_or_else(|| AuditError::page(format!("cannot read rules of stylesheet {href}")))
    }
}

#[async_trait]
impl OpenPage for StaticPage {
    fn handle(&self) -> &dyn PageHandle {
        self
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Hands out a fresh copy of one [`StaticPage`] for every audit.
#[derive(Debug, Clone)]
pub struct StaticPageProvider {
    page: StaticPage,
}

impl StaticPageProvider {
    pub fn new(page: StaticPage) -> Self {
        Self { page }
    }
}

#[async_trait]
impl PageProvider for StaticPageProvider {
    async fn open(&self, _target: &AuditTarget) -> Result<Box<dyn OpenPage>> {
        Ok(Box::new(self.page.clone()))
    }
}

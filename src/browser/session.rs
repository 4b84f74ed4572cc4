//! One Chromium process, one page, one navigation: the lifetime of a single audit.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{EventResponseReceived, ResourceType};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, Page};
use futures::{FutureExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::manager::BrowserOptions;
use super::scripts;
use crate::page::{ElementSnapshot, NavigationTiming, OpenPage, PageHandle, ResourceTiming};
use crate::{AuditError, AuditTarget, Result};

/// A loaded page backed by its own browser process.
///
/// Call [`OpenPage::close`] when done. Dropping an unclosed session aborts the CDP
/// handler task and drops the browser, which kills the child process.
pub struct PageSession {
    browser: Option<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    headers: BTreeMap<String, String>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl PageSession {
    /// Launch a browser and navigate to `target`, waiting for the load event.
    ///
    /// Navigation failures are returned as [`AuditError::Navigation`]; the browser
    /// is shut down before the error is returned.
    pub async fn open(
        target: &AuditTarget,
        options: &BrowserOptions,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Result<Self> {
        let config = options.to_browser_config()?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AuditError::Browser(e.to_string()))?;
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        match navigate(&browser, target, options.navigation_timeout).await {
            Ok((page, headers)) => Ok(Self {
                browser: Some(browser),
                page,
                handler,
                headers,
                _permit: permit,
            }),
            Err(err) => {
                shutdown(&mut browser, &handler).await;
                Err(err)
            }
        }
    }

    async fn eval_json<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        let result = self
            .page
            .evaluate_expression(EvaluateParams::new(script))
            .await
            .map_err(|e| AuditError::page(e.to_string()))?;
        let raw: String = result
            .into_value()
            .map_err(|e| AuditError::page(format!("unexpected script result: {e}")))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

async fn navigate(
    browser: &Browser,
    target: &AuditTarget,
    budget: Duration,
) -> Result<(Page, BTreeMap<String, String>)> {
    let url = target.as_str();
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| AuditError::Browser(e.to_string()))?;
    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .map_err(|e| AuditError::Browser(e.to_string()))?;

    debug!(%url, "navigating");
    match timeout(budget, page.goto(url)).await {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => return Err(AuditError::navigation(url, err.to_string())),
        Err(_) => {
            return Err(AuditError::navigation(
                url,
                format!("timed out after {budget:?}"),
            ))
        }
    }

    // Redirect hops do not emit responseReceived, so the last main-frame document
    // response is the one that produced the page.
    let main_frame = page.mainframe().await.ok().flatten();
    let mut headers = BTreeMap::new();
    while let Some(Some(event)) = responses.next().now_or_never() {
        if event.r#type != ResourceType::Document {
            continue;
        }
        if main_frame.is_some() && event.frame_id != main_frame {
            continue;
        }
        headers = header_map(event.response.headers.inner());
    }

    Ok((page, headers))
}

fn header_map(headers: &serde_json::Value) -> BTreeMap<String, String> {
    match headers {
        serde_json::Value::Object(map) => map
            .iter()
            .filter_map(|(name, value)| {
                value
                    .as_str()
                    .map(|v| (name.to_ascii_lowercase(), v.to_string()))
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

async fn shutdown(browser: &mut Browser, handler: &JoinHandle<()>) {
    if let Err(err) = browser.close().await {
        warn!(error = %err, "browser did not close cleanly");
    }
    if let Err(err) = browser.wait().await {
        warn!(error = %err, "waiting for browser exit failed");
    }
    handler.abort();
}

#[async_trait]
impl PageHandle for PageSession {
    async fn title(&self) -> Result<String> {
        self.eval_json(scripts::TITLE).await
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let script = scripts::bind(scripts::QUERY_ALL, &[("SELECTOR", selector)])?;
        self.eval_json(&script).await
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let script = scripts::bind(scripts::COUNT, &[("SELECTOR", selector)])?;
        self.eval_json(&script).await
    }

    async fn content(&self) -> Result<String> {
        self.eval_json(scripts::CONTENT).await
    }

    fn response_header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_ascii_lowercase()).cloned()
    }

    async fn navigation_timing(&self) -> Result<NavigationTiming> {
        self.eval_json(scripts::NAVIGATION_TIMING).await
    }

    async fn resource_timings(&self) -> Result<Vec<ResourceTiming>> {
        self.eval_json(scripts::RESOURCE_TIMINGS).await
    }

    async fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        let script = scripts::bind(
            scripts::COMPUTED_STYLE,
            &[("SELECTOR", selector), ("PROPERTY", property)],
        )?;
        self.eval_json(&script).await
    }

    async fn stylesheet_hrefs(&self) -> Result<Vec<String>> {
        self.eval_json(scripts::STYLESHEET_HREFS).await
    }

    async fn stylesheet_has_media_query(&self, href: &str) -> Result<bool> {
        let script = scripts::bind(scripts::STYLESHEET_HAS_MEDIA, &[("HREF", href)])?;
        self.eval_json(&script).await
    }
}

#[async_trait]
impl OpenPage for PageSession {
    fn handle(&self) -> &dyn PageHandle {
        self
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut browser) = self.browser.take() {
            shutdown(&mut browser, &self.handler).await;
        }
        self._permit = None;
        Ok(())
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        if self.browser.is_some() {
            warn!("page session dropped without close; killing browser");
        }
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_map_lowercases_names_and_skips_non_strings() {
        let headers = serde_json::json!({
            "Content-Type": "text/html; charset=UTF-8",
            "X-Weird": 5
        });
        let map = header_map(&headers);
        assert_eq!(
            map.get("content-type").map(String::as_str),
            Some("text/html; charset=UTF-8")
        );
        assert!(!map.contains_key("x-weird"));
    }
}

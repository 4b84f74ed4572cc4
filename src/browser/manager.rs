//! Browser manager for coordinating headless browser sessions.
//!
//! This module provides the `BrowserManager` struct for opening one
//! [`PageSession`] per audit, with semaphore-based limiting of concurrent
//! browser processes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::BrowserConfig;
use tokio::sync::Semaphore;
use tracing::debug;

use super::session::PageSession;
use crate::config::Config;
use crate::page::{OpenPage, PageProvider};
use crate::{AuditError, AuditTarget, Result};

/// Default timeout for page navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration options for browser sessions.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Chrome/Chromium binary; auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Pass `--no-sandbox`, required when running as root in containers.
    pub no_sandbox: bool,
    /// Timeout for page navigation, up to the load event.
    pub navigation_timeout: Duration,
    /// Maximum number of concurrent browser sessions.
    pub max_concurrent_sessions: usize,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            no_sandbox: false,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            max_concurrent_sessions: 2,
        }
    }
}

impl BrowserOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            executable: config.browser.executable.clone(),
            headless: config.browser.headless,
            no_sandbox: config.browser.no_sandbox,
            navigation_timeout: config.timeouts.navigation,
            max_concurrent_sessions: config.browser.max_concurrent_sessions,
        }
    }

    pub(crate) fn to_browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder().request_timeout(self.navigation_timeout);
        if !self.headless {
            builder = builder.with_head();
        }
        if self.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(AuditError::Browser)
    }
}

/// Opens browser-backed pages, never more than `max_concurrent_sessions` at once.
#[derive(Debug, Clone)]
pub struct BrowserManager {
    options: BrowserOptions,
    semaphore: Arc<Semaphore>,
}

impl BrowserManager {
    /// Creates a new BrowserManager with the given options.
    pub fn new(options: BrowserOptions) -> Self {
        let permits = options.max_concurrent_sessions.max(1);
        Self {
            options,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Launch a browser and load `target`. The returned session holds a permit
    /// until it is closed or dropped.
    pub async fn open_session(&self, target: &AuditTarget) -> Result<PageSession> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AuditError::Browser("Browser manager unavailable".to_string()))?;
        debug!(
            url = %target,
            available = self.semaphore.available_permits(),
            "launching browser"
        );
        PageSession::open(target, &self.options, Some(permit)).await
    }
}

#[async_trait]
impl PageProvider for BrowserManager {
    async fn open(&self, target: &AuditTarget) -> Result<Box<dyn OpenPage>> {
        Ok(Box::new(self.open_session(target).await?))
    }
}

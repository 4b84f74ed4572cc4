//! The audit pipeline: one page session, every check in order, one report.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::browser::{BrowserManager, BrowserOptions};
use crate::checks::{default_checks, AuditContext, Check};
use crate::config::Config;
use crate::geo::{GeoLocator, IpInfoLocator};
use crate::images::{AttributeImageInspector, ImageInspector};
use crate::page::{PageHandle, PageProvider};
use crate::probe::{HttpProbe, NetworkProbe};
use crate::report::Report;
use crate::{AuditTarget, Result};

/// Runs the check battery against one page per call.
///
/// Collaborators are injected so the pipeline can run over a real browser and
/// network or over in-memory fakes. The pipeline holds no per-audit state;
/// concurrent calls to [`AuditPipeline::run`] each get their own page.
pub struct AuditPipeline {
    pages: Arc<dyn PageProvider>,
    probe: Arc<dyn NetworkProbe>,
    geo: Arc<dyn GeoLocator>,
    images: Arc<dyn ImageInspector>,
    checks: Vec<Box<dyn Check>>,
}

impl AuditPipeline {
    pub fn new(
        pages: Arc<dyn PageProvider>,
        probe: Arc<dyn NetworkProbe>,
        geo: Arc<dyn GeoLocator>,
        images: Arc<dyn ImageInspector>,
    ) -> Self {
        Self {
            pages,
            probe,
            geo,
            images,
            checks: default_checks(),
        }
    }

    /// Replace the check battery. Checks run in the given order.
    pub fn with_checks(mut self, checks: Vec<Box<dyn Check>>) -> Self {
        self.checks = checks;
        self
    }

    /// Browser-backed pipeline with the live network collaborators.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(BrowserManager::new(BrowserOptions::from_config(config))),
            Arc::new(HttpProbe::from_config(config)?),
            Arc::new(IpInfoLocator::from_config(config)?),
            Arc::new(AttributeImageInspector),
        ))
    }

    /// Audit `url`. Fails only when the URL is invalid or the page cannot be
    /// opened; check failures leave their fields unset and are listed in
    /// [`Report::failed_checks`].
    pub async fn run(&self, url: &str) -> Result<Report> {
        let target = AuditTarget::parse(url)?;
        let started = Instant::now();
        info!(url = %target, checks = self.checks.len(), "starting audit");

        let mut page = self.pages.open(&target).await?;
        let report = self.run_on_page(&target, page.handle()).await;
        if let Err(e) = page.close().await {
            warn!(url = %target, error = %e, "failed to close page");
        }

        info!(
            url = %target,
            failed = report.failed_checks.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "audit finished"
        );
        Ok(report)
    }

    /// Run every check against an already opened page. Never fails.
    pub async fn run_on_page(&self, target: &AuditTarget, page: &dyn PageHandle) -> Report {
        let ctx = AuditContext::new(
            target,
            page,
            self.probe.as_ref(),
            self.geo.as_ref(),
            self.images.as_ref(),
        );
        let mut report = Report::new(target.as_str());

        for check in &self.checks {
            let kind = check.kind();
            let started = Instant::now();
            debug!(check = %kind, "running check");

            match check.run(&ctx).await {
                Ok(findings) => {
                    for finding in findings {
                        finding.apply(&mut report);
                    }
                    debug!(
                        check = %kind,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "check finished"
                    );
                }
                Err(e) => {
                    warn!(check = %kind, fields = ?kind.fields(), error = %e, "check failed");
                    report.failed_checks.push(kind.to_string());
                }
            }
        }

        report
    }
}

use async_trait::async_trait;

use super::{non_empty, AuditContext, Check, CheckKind, Finding};
use crate::page::ResourceTiming;
use crate::{AuditError, Result};

/// Advisory threshold quoted in the load-time sentence; never enforced.
const RECOMMENDED_LOAD_SECONDS: u32 = 5;

pub fn describe_load_time(seconds: f64, location: &str) -> String {
    format!(
        "site loads in {seconds} from {location}. Recommended is under {RECOMMENDED_LOAD_SECONDS} seconds"
    )
}

fn render_blocking(resources: &[ResourceTiming]) -> Vec<String> {
    resources
        .iter()
        .filter(|r| r.request_start < r.start_time)
        .map(|r| r.name.clone())
        .collect()
}

/// Navigation load time, annotated with where the audit ran from.
#[derive(Debug, Default)]
pub struct LoadTimeCheck;

#[async_trait]
impl Check for LoadTimeCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::LoadTime
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let timing = ctx.page.navigation_timing().await?;
        let seconds = timing
            .load_seconds()
            .ok_or_else(|| AuditError::check(self.kind(), "load event has not finished"))?;
        let location = ctx.geo.locate().await?;
        Ok(vec![Finding::LoadTime(describe_load_time(seconds, &location))])
    }
}

#[derive(Debug, Default)]
pub struct RenderBlockingCheck;

#[async_trait]
impl Check for RenderBlockingCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::RenderBlocking
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let resources = ctx.page.resource_timings().await?;
        Ok(vec![Finding::RenderBlocking(non_empty(render_blocking(
            &resources,
        )))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, start_time: f64, request_start: f64) -> ResourceTiming {
        ResourceTiming {
            name: name.to_string(),
            start_time,
            request_start,
        }
    }

    #[test]
    fn load_time_sentence() {
        assert_eq!(
            describe_load_time(1.25, "Lisbon, Lisbon, PT"),
            "site loads in 1.25 from Lisbon, Lisbon, PT. Recommended is under 5 seconds"
        );
    }

    #[test]
    fn blocking_when_request_starts_before_start_time() {
        let resources = [
            resource("https://example.com/app.css", 120.0, 80.0),
            resource("https://example.com/app.js", 100.0, 130.0),
            resource("https://example.com/font.woff2", 50.0, 50.0),
        ];
        assert_eq!(render_blocking(&resources), ["https://example.com/app.css"]);
    }
}

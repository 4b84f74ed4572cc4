//! Checks that probe the audited origin over the network instead of reading the page.

use async_trait::async_trait;
use tracing::debug;

use super::{AuditContext, Check, CheckKind, Finding};
use crate::report::SpfField;
use crate::Result;

/// `Disallow:` lines of a robots.txt body, prefix matched case-insensitively and trimmed.
pub fn disallow_directives(robots: &str) -> Vec<String> {
    robots
        .split('\n')
        .filter(|line| line.to_lowercase().starts_with("disallow:"))
        .map(|line| line.trim().to_string())
        .collect()
}

async fn root_file_exists(ctx: &AuditContext<'_>, file: &str) -> Result<bool> {
    let status = ctx.probe.head_status(&ctx.target.root_file(file)).await?;
    Ok(status == 200)
}

#[derive(Debug, Default)]
pub struct SitemapCheck;

#[async_trait]
impl Check for SitemapCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Sitemap
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        Ok(vec![Finding::HasSitemap(
            root_file_exists(ctx, "sitemap.xml").await?,
        )])
    }
}

#[derive(Debug, Default)]
pub struct RobotsCheck;

#[async_trait]
impl Check for RobotsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Robots
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        Ok(vec![Finding::HasRobots(
            root_file_exists(ctx, "robots.txt").await?,
        )])
    }
}

#[derive(Debug, Default)]
pub struct RobotsDisallowCheck;

#[async_trait]
impl Check for RobotsDisallowCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::RobotsDisallow
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let body = ctx
            .probe
            .get_text(&ctx.target.root_file("robots.txt"))
            .await?;
        Ok(vec![Finding::DisallowDirectives(disallow_directives(&body))])
    }
}

#[derive(Debug, Default)]
pub struct AdsTxtCheck;

#[async_trait]
impl Check for AdsTxtCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::AdsTxt
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        Ok(vec![Finding::HasAds(root_file_exists(ctx, "ads.txt").await?)])
    }
}

/// `Location` of a 3xx answer to the audited URL. Probe failures read as "no redirect".
#[derive(Debug, Default)]
pub struct RedirectCheck;

#[async_trait]
impl Check for RedirectCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Redirect
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let location = match ctx.probe.head(ctx.target.as_str()).await {
            Ok(head) if head.is_redirect() => head.location,
            Ok(_) => None,
            Err(e) => {
                debug!(url = %ctx.target, error = %e, "redirect probe failed");
                None
            }
        };
        Ok(vec![Finding::Redirect(location)])
    }
}

/// Whether the host and its `www.` twin resolve to the same address.
#[derive(Debug, Default)]
pub struct CanonicalizationCheck;

#[async_trait]
impl Check for CanonicalizationCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Canonicalization
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let variant = ctx.target.www_variant();
        let url = ctx.target.as_str();

        let resolved = async {
            let ip = ctx.probe.resolve_ip(ctx.target.host()).await?;
            let variant_ip = ctx.probe.resolve_ip(&variant.host).await?;
            Ok::<_, crate::error::ProbeError>((ip, variant_ip))
        }
        .await;

        let message = match resolved {
            Ok((ip, variant_ip)) if ip == variant_ip => Some(format!(
                "The URLs {url} and {} resolve to the same IP address: {ip}",
                variant.url
            )),
            Ok((ip, variant_ip)) => Some(format!(
                "The URLs {url} and {variant_url} do not resolve to the same IP address. {url} - {ip}, {variant_url} - {variant_ip}",
                variant_url = variant.url
            )),
            Err(e) => {
                debug!(host = ctx.target.host(), error = %e, "canonicalization lookup failed");
                None
            }
        };
        Ok(vec![Finding::Canonized(message)])
    }
}

/// The host's SPF record. Every lookup failure collapses to `false`.
#[derive(Debug, Default)]
pub struct SpfCheck;

#[async_trait]
impl Check for SpfCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Spf
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let spf = match ctx.probe.query_spf(ctx.target.host()).await {
            Ok(record) => SpfField::from(record),
            Err(e) => {
                debug!(host = ctx.target.host(), error = %e, "SPF lookup failed");
                SpfField::Missing
            }
        };
        Ok(vec![Finding::Spf(spf)])
    }
}

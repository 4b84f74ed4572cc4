//! Crawler directives: robots meta, canonical link, meta refresh, and the
//! declared content type.

use async_trait::async_trait;

use super::{present, AuditContext, Check, CheckKind, Finding};
use crate::Result;

const NOINDEX_META: &str = r#"name="robots" content="noindex""#;
const NOFOLLOW_META: &str = r#"name="robots" content="nofollow""#;
const CANONICAL_REL: &str = r#"rel="canonical""#;
const META_REFRESH: &str = r#"http-equiv="refresh""#;

/// Raw `content-type` header of the navigation response.
#[derive(Debug, Default)]
pub struct CharsetCheck;

#[async_trait]
impl Check for CharsetCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Charset
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        Ok(vec![Finding::Charset(
            ctx.page.response_header("content-type"),
        )])
    }
}

/// `noindex`/`nofollow` robots meta, matched on the literal source text.
#[derive(Debug, Default)]
pub struct RobotsMetaCheck;

#[async_trait]
impl Check for RobotsMetaCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::RobotsMeta
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let source = ctx.page_source().await?;
        Ok(vec![
            Finding::NoindexTag(present(source.contains(NOINDEX_META))),
            Finding::NofollowTag(present(source.contains(NOFOLLOW_META))),
        ])
    }
}

#[derive(Debug, Default)]
pub struct CanonicalTagCheck;

#[async_trait]
impl Check for CanonicalTagCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::CanonicalTag
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        if !ctx.page_source().await?.contains(CANONICAL_REL) {
            return Ok(vec![Finding::CanonicalTag(None)]);
        }
        let href = ctx
            .page
            .query_one(r#"link[rel="canonical"]"#)
            .await?
            .and_then(|link| link.attr("href").map(str::to_string));
        Ok(vec![Finding::CanonicalTag(href)])
    }
}

#[derive(Debug, Default)]
pub struct MetaRefreshCheck;

#[async_trait]
impl Check for MetaRefreshCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::MetaRefresh
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let source = ctx.page_source().await?;
        Ok(vec![Finding::MetaRefresh(present(
            source.contains(META_REFRESH),
        ))])
    }
}

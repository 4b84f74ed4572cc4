use async_trait::async_trait;
use tracing::debug;

use super::{AuditContext, Check, CheckKind, Finding};
use crate::Result;

#[derive(Debug, Default)]
pub struct ViewportCheck;

#[async_trait]
impl Check for ViewportCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Viewport
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let url = ctx.target.as_str();
        let sentence = match ctx.page.viewport_meta_content().await? {
            Some(content) if !content.is_empty() => format!(
                "The webpage at {url} is using a viewport meta tag with content: {content}"
            ),
            _ => format!("The webpage at {url} does not appear to be using a viewport meta tag."),
        };
        Ok(vec![Finding::ViewportContent(sentence)])
    }
}

/// Responsive if the body's computed `media` is present and not `none`,
/// otherwise if any readable stylesheet contains an `@media` rule. An absent
/// `media` is no signal. Unreadable sheets count as no match.
#[derive(Debug, Default)]
pub struct ResponsiveCheck;

#[async_trait]
impl Check for ResponsiveCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Responsive
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        if let Some(media) = ctx.page.computed_style("body", "media").await? {
            if media != "none" {
                return Ok(vec![Finding::Responsive(Some(true))]);
            }
        }

        for href in ctx.page.stylesheet_hrefs().await? {
            match ctx.page.stylesheet_has_media_query(&href).await {
                Ok(true) => return Ok(vec![Finding::Responsive(Some(true))]),
                Ok(false) => {}
                Err(e) => debug!(%href, error = %e, "stylesheet rules unreadable"),
            }
        }
        Ok(vec![Finding::Responsive(None)])
    }
}

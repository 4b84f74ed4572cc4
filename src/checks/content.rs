//! Checks over the document's markup and text.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{non_empty, present, AuditContext, Check, CheckKind, Finding};
use crate::{AuditError, Result};

/// Opening tags scanned for in the raw source, matched case-sensitively.
pub const DEPRECATED_TAGS: [&str; 15] = [
    "font", "center", "strike", "u", "applet", "basefont", "big", "frame", "frameset", "noframes",
    "marquee", "blink", "acronym", "dir", "tt",
];

const ANALYTICS_SNIPPETS: [&str; 3] = [
    "www.googletagmanager.com/gtag/js",
    "analytics.js",
    "gtag('js', new Date())",
];

const FLASH_SELECTORS: [&str; 2] = [
    r#"object[type="application/x-shockwave-flash"]"#,
    r#"embed[type="application/x-shockwave-flash"]"#,
];

/// Reference DOM budget shown next to the element count.
const DOM_SIZE_BUDGET: usize = 1500;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

/// Deprecated tags whose literal opening `<tag` appears in `source`, in list order.
pub fn find_deprecated_tags(source: &str) -> Vec<String> {
    DEPRECATED_TAGS
        .iter()
        .filter(|tag| source.contains(&format!("<{tag}")))
        .map(|tag| tag.to_string())
        .collect()
}

pub fn find_emails(source: &str) -> Vec<String> {
    EMAIL
        .find_iter(source)
        .map(|m| m.as_str().to_string())
        .collect()
}

async fn first_attr(ctx: &AuditContext<'_>, selector: &str, attr: &str) -> Result<Option<String>> {
    Ok(ctx
        .page
        .query_one(selector)
        .await?
        .and_then(|el| el.attr(attr).map(str::to_string)))
}

async fn texts(ctx: &AuditContext<'_>, selector: &str) -> Result<Vec<String>> {
    Ok(ctx
        .page
        .query_all(selector)
        .await?
        .into_iter()
        .map(|el| el.text.trim().to_string())
        .collect())
}

#[derive(Debug, Default)]
pub struct TitleCheck;

#[async_trait]
impl Check for TitleCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Title
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        Ok(vec![Finding::Title(ctx.page.title().await?)])
    }
}

#[derive(Debug, Default)]
pub struct HeadingsCheck;

#[async_trait]
impl Check for HeadingsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Headings
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        Ok(vec![
            Finding::H1s(texts(ctx, "h1").await?),
            Finding::H2s(texts(ctx, "h2").await?),
        ])
    }
}

#[derive(Debug, Default)]
pub struct MetaDescriptionCheck;

#[async_trait]
impl Check for MetaDescriptionCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::MetaDescription
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let description = first_attr(ctx, r#"meta[name="description"]"#, "content").await?;
        Ok(vec![Finding::MetaDescription(description)])
    }
}

/// Open Graph and Twitter card title/description, read from `content`.
#[derive(Debug, Default)]
pub struct SocialMetaCheck;

#[async_trait]
impl Check for SocialMetaCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::SocialMeta
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        Ok(vec![
            Finding::OgTitle(first_attr(ctx, r#"meta[property="og:title"]"#, "content").await?),
            Finding::OgDescription(
                first_attr(ctx, r#"meta[property="og:description"]"#, "content").await?,
            ),
            Finding::TwitterTitle(
                first_attr(ctx, r#"meta[name="twitter:title"]"#, "content").await?,
            ),
            Finding::TwitterDescription(
                first_attr(ctx, r#"meta[name="twitter:description"]"#, "content").await?,
            ),
        ])
    }
}

/// Origin followed by the icon's `href`, concatenated as-is.
#[derive(Debug, Default)]
pub struct FaviconCheck;

#[async_trait]
impl Check for FaviconCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Favicon
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let Some(icon) = ctx
            .page
            .query_one(r#"link[rel="icon"], link[rel="shortcut icon"]"#)
            .await?
        else {
            return Ok(vec![Finding::Favicon(None)]);
        };
        let href = icon
            .attr("href")
            .ok_or_else(|| AuditError::check(self.kind(), "icon link has no href"))?;
        Ok(vec![Finding::Favicon(Some(format!(
            "{}{}",
            ctx.target.origin(),
            href
        )))])
    }
}

#[derive(Debug, Default)]
pub struct DeprecatedTagsCheck;

#[async_trait]
impl Check for DeprecatedTagsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DeprecatedTags
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let source = ctx.page_source().await?;
        Ok(vec![Finding::DeprecatedTags(find_deprecated_tags(source))])
    }
}

#[derive(Debug, Default)]
pub struct InlineStylesCheck;

#[async_trait]
impl Check for InlineStylesCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::InlineStyles
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let styled = ctx.page.count("[style]").await?;
        Ok(vec![Finding::InlineStyles(styled > 0)])
    }
}

#[derive(Debug, Default)]
pub struct ImagesCheck;

#[async_trait]
impl Check for ImagesCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Images
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let images = ctx.page.query_all("img").await?;
        Ok(vec![Finding::Images(ctx.images.inspect(&images)?)])
    }
}

#[derive(Debug, Default)]
pub struct AnalyticsCheck;

#[async_trait]
impl Check for AnalyticsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Analytics
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let source = ctx.page_source().await?;
        let found = ANALYTICS_SNIPPETS.iter().any(|s| source.contains(s));
        Ok(vec![Finding::HasAnalytics(present(found))])
    }
}

#[derive(Debug, Default)]
pub struct DomSizeCheck;

#[async_trait]
impl Check for DomSizeCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DomSize
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let nodes = ctx.page.count_all_elements().await?;
        Ok(vec![Finding::DomSize(format!("{nodes} of {DOM_SIZE_BUDGET}"))])
    }
}

/// Outer markup of Flash `<object>`s, then Flash `<embed>`s.
#[derive(Debug, Default)]
pub struct FlashCheck;

#[async_trait]
impl Check for FlashCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Flash
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let mut markup = Vec::new();
        for selector in FLASH_SELECTORS {
            markup.extend(
                ctx.page
                    .query_all(selector)
                    .await?
                    .into_iter()
                    .map(|el| el.outer_html),
            );
        }
        Ok(vec![Finding::FlashMultimedia(non_empty(markup))])
    }
}

#[derive(Debug, Default)]
pub struct NestedTablesCheck;

#[async_trait]
impl Check for NestedTablesCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::NestedTables
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let nested = ctx.page.count("table table").await?;
        Ok(vec![Finding::NestedTables(present(nested > 0))])
    }
}

#[derive(Debug, Default)]
pub struct DoctypeCheck;

#[async_trait]
impl Check for DoctypeCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Doctype
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let source = ctx.page_source().await?;
        Ok(vec![Finding::Doctype(present(source.starts_with("<!DOCTYPE")))])
    }
}

#[derive(Debug, Default)]
pub struct PlaintextEmailsCheck;

#[async_trait]
impl Check for PlaintextEmailsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::PlaintextEmails
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let source = ctx.page_source().await?;
        Ok(vec![Finding::PlaintextEmails(non_empty(find_emails(source)))])
    }
}

//! The audit battery.
//!
//! Each [`Check`] reads the loaded page (and, for some, the network) and
//! returns [`Finding`]s. Checks never see each other's output; the pipeline
//! applies a check's findings to the report only when the whole check succeeded.

mod content;
mod indexing;
mod kind;
mod links;
mod mobile;
mod performance;
mod site;


use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::geo::GeoLocator;
use crate::images::{ImageInspector, ImageRecord};
use crate::page::PageHandle;
use crate::probe::NetworkProbe;
use crate::report::{LinkInventory, Report, SpfField};
use crate::{AuditTarget, Result};

pub use content::{
    find_deprecated_tags, find_emails, AnalyticsCheck, DeprecatedTagsCheck, DoctypeCheck,
    DomSizeCheck, FaviconCheck, FlashCheck, HeadingsCheck, ImagesCheck, InlineStylesCheck,
    MetaDescriptionCheck, NestedTablesCheck, PlaintextEmailsCheck, SocialMetaCheck, TitleCheck,
    DEPRECATED_TAGS,
};
pub use indexing::{CanonicalTagCheck, CharsetCheck, MetaRefreshCheck, RobotsMetaCheck};
pub use kind::CheckKind;
pub use links::{is_seo_friendly_text, LinksCheck, SocialLinksCheck};
pub use mobile::{ResponsiveCheck, ViewportCheck};
pub use performance::{describe_load_time, LoadTimeCheck, RenderBlockingCheck};
pub use site::{
    disallow_directives, AdsTxtCheck, CanonicalizationCheck, RedirectCheck, RobotsCheck,
    RobotsDisallowCheck, SitemapCheck, SpfCheck,
};

/// Everything a check may read during one audit.
pub struct AuditContext<'a> {
    pub target: &'a AuditTarget,
    pub page: &'a dyn PageHandle,
    pub probe: &'a dyn NetworkProbe,
    pub geo: &'a dyn GeoLocator,
    pub images: &'a dyn ImageInspector,
    source: OnceCell<String>,
}

impl<'a> AuditContext<'a> {
    pub fn new(
        target: &'a AuditTarget,
        page: &'a dyn PageHandle,
        probe: &'a dyn NetworkProbe,
        geo: &'a dyn GeoLocator,
        images: &'a dyn ImageInspector,
    ) -> Self {
        Self {
            target,
            page,
            probe,
            geo,
            images,
            source: OnceCell::new(),
        }
    }

    /// Serialized page source, read from the page once and shared by every check.
    pub async fn page_source(&self) -> Result<&str> {
        self.source
            .get_or_try_init(|| self.page.content())
            .await
            .map(String::as_str)
    }
}

/// A value for one report field.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    Title(String),
    H1s(Vec<String>),
    H2s(Vec<String>),
    MetaDescription(Option<String>),
    OgTitle(Option<String>),
    OgDescription(Option<String>),
    TwitterTitle(Option<String>),
    TwitterDescription(Option<String>),
    HasSitemap(bool),
    HasRobots(bool),
    DisallowDirectives(Vec<String>),
    HasAds(bool),
    Favicon(Option<String>),
    DeprecatedTags(Vec<String>),
    InlineStyles(bool),
    Images(Vec<ImageRecord>),
    Links(LinkInventory),
    HasAnalytics(Option<bool>),
    Charset(Option<String>),
    Socials(Option<Vec<String>>),
    DomSize(String),
    LoadTime(String),
    FlashMultimedia(Option<Vec<String>>),
    RenderBlocking(Option<Vec<String>>),
    NestedTables(Option<bool>),
    Doctype(Option<bool>),
    Redirect(Option<String>),
    Canonized(Option<String>),
    PlaintextEmails(Option<Vec<String>>),
    ViewportContent(String),
    NoindexTag(Option<bool>),
    NofollowTag(Option<bool>),
    CanonicalTag(Option<String>),
    MetaRefresh(Option<bool>),
    Spf(SpfField),
    Responsive(Option<bool>),
}

impl Finding {
    pub fn apply(self, report: &mut Report) {
        match self {
            Finding::Title(v) => report.title = Some(v),
            Finding::H1s(v) => report.h1s = Some(v),
            Finding::H2s(v) => report.h2s = Some(v),
            Finding::MetaDescription(v) => report.meta_description = v,
            Finding::OgTitle(v) => report.og_title = v,
            Finding::OgDescription(v) => report.og_description = v,
            Finding::TwitterTitle(v) => report.twitter_title = v,
            Finding::TwitterDescription(v) => report.twitter_description = v,
            Finding::HasSitemap(v) => report.has_sitemap = Some(v),
            Finding::HasRobots(v) => report.has_robots = Some(v),
            Finding::DisallowDirectives(v) => report.disallow_directives = Some(v),
            Finding::HasAds(v) => report.has_ads = Some(v),
            Finding::Favicon(v) => report.favicon = v,
            Finding::DeprecatedTags(v) => report.deprecated_tags = Some(v),
            Finding::InlineStyles(v) => report.inline_styles = Some(v),
            Finding::Images(v) => report.images = Some(v),
            Finding::Links(v) => report.non_seofriendly_links = Some(v),
            Finding::HasAnalytics(v) => report.has_analytics = v,
            Finding::Charset(v) => report.charset = v,
            Finding::Socials(v) => report.socials = v,
            Finding::DomSize(v) => report.domsize = Some(v),
            Finding::LoadTime(v) => report.load_time = Some(v),
            Finding::FlashMultimedia(v) => report.has_flash_multimedia = v,
            Finding::RenderBlocking(v) => report.has_render_blocking = v,
            Finding::NestedTables(v) => report.has_nested_tables = v,
            Finding::Doctype(v) => report.has_doctype_declaration = v,
            Finding::Redirect(v) => report.has_redirect = v,
            Finding::Canonized(v) => report.has_canonized = v,
            Finding::PlaintextEmails(v) => report.plaintext_emails = v,
            Finding::ViewportContent(v) => report.viewport_content = Some(v),
            Finding::NoindexTag(v) => report.noindex_tag = v,
            Finding::NofollowTag(v) => report.nofollow_tag = v,
            Finding::CanonicalTag(v) => report.canonical_tag = v,
            Finding::MetaRefresh(v) => report.meta_refresh = v,
            Finding::Spf(v) => report.dns_spf_record = v,
            Finding::Responsive(v) => report.media_query_responsive = v,
        }
    }
}

/// `Some(true)` when the signal is present, `None` otherwise.
pub(crate) fn present(found: bool) -> Option<bool> {
    found.then_some(true)
}

/// `None` for an empty list.
pub(crate) fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

#[async_trait]
pub trait Check: Send + Sync {
    fn kind(&self) -> CheckKind;
    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>>;
}

/// Returns the full battery, in report order.
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::<TitleCheck>::default(),
        Box::<HeadingsCheck>::default(),
        Box::<MetaDescriptionCheck>::default(),
        Box::<SocialMetaCheck>::default(),
        Box::<SitemapCheck>::default(),
        Box::<RobotsCheck>::default(),
        Box::<RobotsDisallowCheck>::default(),
        Box::<AdsTxtCheck>::default(),
        Box::<FaviconCheck>::default(),
        Box::<DeprecatedTagsCheck>::default(),
        Box::<InlineStylesCheck>::default(),
        Box::<ImagesCheck>::default(),
        Box::<LinksCheck>::default(),
        Box::<AnalyticsCheck>::default(),
        Box::<CharsetCheck>::default(),
        Box::<SocialLinksCheck>::default(),
        Box::<DomSizeCheck>::default(),
        Box::<LoadTimeCheck>::default(),
        Box::<FlashCheck>::default(),
        Box::<RenderBlockingCheck>::default(),
        Box::<NestedTablesCheck>::default(),
        Box::<DoctypeCheck>::default(),
        Box::<RedirectCheck>::default(),
        Box::<CanonicalizationCheck>::default(),
        Box::<PlaintextEmailsCheck>::default(),
        Box::<ViewportCheck>::default(),
        Box::<RobotsMetaCheck>::default(),
        Box::<CanonicalTagCheck>::default(),
        Box::<MetaRefreshCheck>::default(),
        Box::<SpfCheck>::default(),
        Box::<ResponsiveCheck>::default(),
    ]
}

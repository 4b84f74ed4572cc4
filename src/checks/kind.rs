use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuditError;

/// Identity of one check in the audit battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Title,
    Headings,
    MetaDescription,
    SocialMeta,
    Sitemap,
    Robots,
    RobotsDisallow,
    AdsTxt,
    Favicon,
    DeprecatedTags,
    InlineStyles,
    Images,
    Links,
    Analytics,
    Charset,
    SocialLinks,
    DomSize,
    LoadTime,
    Flash,
    RenderBlocking,
    NestedTables,
    Doctype,
    Redirect,
    Canonicalization,
    PlaintextEmails,
    Viewport,
    RobotsMeta,
    CanonicalTag,
    MetaRefresh,
    Spf,
    Responsive,
}

impl CheckKind {
    /// Every check, in report order.
    pub const fn all() -> [CheckKind; 31] {
        [
            CheckKind::Title,
            CheckKind::Headings,
            CheckKind::MetaDescription,
            CheckKind::SocialMeta,
            CheckKind::Sitemap,
            CheckKind::Robots,
            CheckKind::RobotsDisallow,
            CheckKind::AdsTxt,
            CheckKind::Favicon,
            CheckKind::DeprecatedTags,
            CheckKind::InlineStyles,
            CheckKind::Images,
            CheckKind::Links,
            CheckKind::Analytics,
            CheckKind::Charset,
            CheckKind::SocialLinks,
            CheckKind::DomSize,
            CheckKind::LoadTime,
            CheckKind::Flash,
            CheckKind::RenderBlocking,
            CheckKind::NestedTables,
            CheckKind::Doctype,
            CheckKind::Redirect,
            CheckKind::Canonicalization,
            CheckKind::PlaintextEmails,
            CheckKind::Viewport,
            CheckKind::RobotsMeta,
            CheckKind::CanonicalTag,
            CheckKind::MetaRefresh,
            CheckKind::Spf,
            CheckKind::Responsive,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            CheckKind::Title => "title",
            CheckKind::Headings => "headings",
            CheckKind::MetaDescription => "meta_description",
            CheckKind::SocialMeta => "social_meta",
            CheckKind::Sitemap => "sitemap",
            CheckKind::Robots => "robots",
            CheckKind::RobotsDisallow => "robots_disallow",
            CheckKind::AdsTxt => "ads_txt",
            CheckKind::Favicon => "favicon",
            CheckKind::DeprecatedTags => "deprecated_tags",
            CheckKind::InlineStyles => "inline_styles",
            CheckKind::Images => "images",
            CheckKind::Links => "links",
            CheckKind::Analytics => "analytics",
            CheckKind::Charset => "charset",
            CheckKind::SocialLinks => "social_links",
            CheckKind::DomSize => "dom_size",
            CheckKind::LoadTime => "load_time",
            CheckKind::Flash => "flash",
            CheckKind::RenderBlocking => "render_blocking",
            CheckKind::NestedTables => "nested_tables",
            CheckKind::Doctype => "doctype",
            CheckKind::Redirect => "redirect",
            CheckKind::Canonicalization => "canonicalization",
            CheckKind::PlaintextEmails => "plaintext_emails",
            CheckKind::Viewport => "viewport",
            CheckKind::RobotsMeta => "robots_meta",
            CheckKind::CanonicalTag => "canonical_tag",
            CheckKind::MetaRefresh => "meta_refresh",
            CheckKind::Spf => "spf",
            CheckKind::Responsive => "responsive",
        }
    }

    /// Report fields this check owns.
    pub const fn fields(&self) -> &'static [&'static str] {
        match self {
            CheckKind::Title => &["title"],
            CheckKind::Headings => &["h1s", "h2s"],
            CheckKind::MetaDescription => &["meta_description"],
            CheckKind::SocialMeta => &[
                "og_title",
                "og_description",
                "twitter_title",
                "twitter_description",
            ],
            CheckKind::Sitemap => &["has_sitemap"],
            CheckKind::Robots => &["has_robots"],
            CheckKind::RobotsDisallow => &["disallow_directives"],
            CheckKind::AdsTxt => &["has_ads"],
            CheckKind::Favicon => &["favicon"],
            CheckKind::DeprecatedTags => &["deprecated_tags"],
            CheckKind::InlineStyles => &["inline_styles"],
            CheckKind::Images => &["images"],
            CheckKind::Links => &["non_seofriendly_links"],
            CheckKind::Analytics => &["has_analytics"],
            CheckKind::Charset => &["charset"],
            CheckKind::SocialLinks => &["socials"],
            CheckKind::DomSize => &["domsize"],
            CheckKind::LoadTime => &["load_time"],
            CheckKind::Flash => &["has_flash_multimedia"],
            CheckKind::RenderBlocking => &["has_render_blocking"],
            CheckKind::NestedTables => &["has_nested_tables"],
            CheckKind::Doctype => &["has_doctype_declaration"],
            CheckKind::Redirect => &["has_redirect"],
            CheckKind::Canonicalization => &["has_canonized"],
            CheckKind::PlaintextEmails => &["plaintext_emails"],
            CheckKind::Viewport => &["viewport_content"],
            CheckKind::RobotsMeta => &["noindex_tag", "nofollow_tag"],
            CheckKind::CanonicalTag => &["canonical_tag"],
            CheckKind::MetaRefresh => &["meta_refresh"],
            CheckKind::Spf => &["dns_spf_record"],
            CheckKind::Responsive => &["media_query_responsive"],
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckKind {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        CheckKind::all()
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| AuditError::Config(format!("Unknown check: {s}")))
    }
}

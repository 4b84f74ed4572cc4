use async_trait::async_trait;

use super::{non_empty, AuditContext, Check, CheckKind, Finding};
use crate::page::ElementSnapshot;
use crate::report::{LinkInventory, LinkRecord};
use crate::Result;

const BOILERPLATE_TEXT: [&str; 3] = ["click here", "more", "read more"];
const MAX_LINK_TEXT_CHARS: usize = 60;

const SOCIAL_SELECTOR: &str = r#"a[href*="facebook.com"], a[href*="twitter.com"], a[href*="instagram.com"], a[href*="linkedin.com"]"#;

/// Whether anchor text (already trimmed) describes its target well enough for search engines.
pub fn is_seo_friendly_text(text: &str) -> bool {
    !text.is_empty()
        && !BOILERPLATE_TEXT.contains(&text.to_lowercase().as_str())
        && text.chars().count() <= MAX_LINK_TEXT_CHARS
}

fn link_record(anchor: &ElementSnapshot) -> LinkRecord {
    let owned = |name: &str| anchor.attr(name).map(str::to_string);
    LinkRecord {
        href: owned("href"),
        visible_text: anchor.text.trim().to_string(),
        rel: owned("rel"),
        target: owned("target"),
        title: owned("title"),
    }
}

/// Every anchor on the page. `friend` turns false as soon as one anchor has
/// empty, boilerplate or overlong text.
#[derive(Debug, Default)]
pub struct LinksCheck;

#[async_trait]
impl Check for LinksCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Links
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let link_details: Vec<LinkRecord> = ctx
            .page
            .query_all("a")
            .await?
            .iter()
            .map(link_record)
            .collect();
        let friend = link_details
            .iter()
            .all(|link| is_seo_friendly_text(&link.visible_text));
        Ok(vec![Finding::Links(LinkInventory {
            friend,
            link_details,
        })])
    }
}

#[derive(Debug, Default)]
pub struct SocialLinksCheck;

#[async_trait]
impl Check for SocialLinksCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::SocialLinks
    }

    async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>> {
        let hrefs = ctx
            .page
            .query_all(SOCIAL_SELECTOR)
            .await?
            .into_iter()
            .filter_map(|a| a.attr("href").map(str::to_string))
            .collect();
        Ok(vec![Finding::Socials(non_empty(hrefs))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptive_text_is_friendly() {
        assert!(is_seo_friendly_text("Learn about pricing"));
        assert!(is_seo_friendly_text(&"x".repeat(60)));
    }

    #[test]
    fn empty_boilerplate_and_long_text_are_not() {
        assert!(!is_seo_friendly_text(""));
        assert!(!is_seo_friendly_text("Click here"));
        assert!(!is_seo_friendly_text("READ MORE"));
        assert!(!is_seo_friendly_text("more"));
        assert!(!is_seo_friendly_text(&"x".repeat(61)));
    }

    #[test]
    fn boilerplate_must_match_whole_text() {
        assert!(is_seo_friendly_text("Read more about pricing"));
    }
}

//! Fixed-shape audit report.
//!
//! Every field is always serialized. A field that could not be computed is
//! `null`, except `dns_spf_record`, which is `false` when no SPF record was found.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::images::ImageRecord;

/// One anchor element, captured at audit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub href: Option<String>,
    #[serde(rename = "text")]
    pub visible_text: String,
    pub rel: Option<String>,
    pub target: Option<String>,
    pub title: Option<String>,
}

/// Every link on the page plus the aggregate "SEO-friendly anchor text" verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInventory {
    pub friend: bool,
    pub link_details: Vec<LinkRecord>,
}

/// The SPF TXT record of the audited host, or `false` when there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpfField {
    Record(String),
    #[default]
    Missing,
}

impl SpfField {
    pub fn as_record(&self) -> Option<&str> {
        match self {
            SpfField::Record(record) => Some(record),
            SpfField::Missing => None,
        }
    }
}

impl From<Option<String>> for SpfField {
    fn from(record: Option<String>) -> Self {
        record.map_or(SpfField::Missing, SpfField::Record)
    }
}

impl Serialize for SpfField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SpfField::Record(record) => serializer.serialize_str(record),
            SpfField::Missing => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for SpfField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Record(String),
            Flag(bool),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Record(record) => SpfField::Record(record),
            Raw::Flag(_) | Raw::Null(()) => SpfField::Missing,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub url: String,

    pub title: Option<String>,
    pub h1s: Option<Vec<String>>,
    pub h2s: Option<Vec<String>>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,

    pub has_sitemap: Option<bool>,
    pub has_robots: Option<bool>,
    pub disallow_directives: Option<Vec<String>>,
    pub has_ads: Option<bool>,

    pub favicon: Option<String>,
    pub deprecated_tags: Option<Vec<String>>,
    pub inline_styles: Option<bool>,
    pub images: Option<Vec<ImageRecord>>,
    pub non_seofriendly_links: Option<LinkInventory>,
    pub has_analytics: Option<bool>,
    pub charset: Option<String>,
    pub socials: Option<Vec<String>>,
    pub domsize: Option<String>,
    pub load_time: Option<String>,
    pub has_flash_multimedia: Option<Vec<String>>,
    pub has_render_blocking: Option<Vec<String>>,
    pub has_nested_tables: Option<bool>,
    pub has_doctype_declaration: Option<bool>,

    pub has_redirect: Option<String>,
    pub has_canonized: Option<String>,
    pub plaintext_emails: Option<Vec<String>>,
    pub viewport_content: Option<String>,
    pub noindex_tag: Option<bool>,
    pub canonical_tag: Option<String>,
    pub nofollow_tag: Option<bool>,
    pub meta_refresh: Option<bool>,
    pub dns_spf_record: SpfField,
    pub media_query_responsive: Option<bool>,

    /// Names of the checks that failed and left their fields unset.
    pub failed_checks: Vec<String>,
}

impl Report {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Serialized value of the field called `name`.
    pub fn field(&self, name: &str) -> Option<serde_json::Value> {
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn empty_report_serializes_every_field() {
        let value = serde_json::to_value(Report::new("https://example.com")).expect("serialize");
        let object = value.as_object().expect("report is an object");

        assert_eq!(object.len(), 38);
        assert_eq!(object["title"], Value::Null);
        assert_eq!(object["non_seofriendly_links"], Value::Null);
        assert_eq!(object["dns_spf_record"], json!(false));
        assert_eq!(object["failed_checks"], json!([]));
    }

    #[test]
    fn spf_record_serializes_as_its_text() {
        let report = Report {
            dns_spf_record: SpfField::Record("v=spf1 -all".into()),
            ..Report::default()
        };
        assert_eq!(report.field("dns_spf_record"), Some(json!("v=spf1 -all")));
    }

    #[test]
    fn spf_field_reads_back_from_both_shapes() {
        let record: SpfField = serde_json::from_value(json!("v=spf1 ~all")).expect("string");
        let missing: SpfField = serde_json::from_value(json!(false)).expect("bool");
        assert_eq!(record.as_record(), Some("v=spf1 ~all"));
        assert_eq!(missing, SpfField::Missing);
    }

    #[test]
    fn link_record_uses_text_key() {
        let link = LinkRecord {
            href: Some("/pricing".into()),
            visible_text: "Pricing".into(),
            ..LinkRecord::default()
        };
        let value = serde_json::to_value(&link).expect("serialize");
        assert_eq!(value["text"], json!("Pricing"));
        assert_eq!(value["rel"], Value::Null);
    }
}

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{pipeline, pipeline_with, FakeProbe, SITE};
use seo_audit_lib::{
    AuditError, AuditTarget, CheckKind, NavigationTiming, OpenPage, PageProvider, ProbeError,
    Report, SpfField, StaticPage,
};
use serde_json::{json, Value};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Acme Pricing</title>
  <meta name="description" content="Plans for every team">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta property="og:title" content="Acme">
  <link rel="icon" href="/favicon.ico">
  <link rel="canonical" href="https://example.com/pricing">
  <link rel="stylesheet" href="/main.css">
</head>
<body>
  <h1>Pricing</h1>
  <h2>Starter</h2>
  <h2>Team</h2>
  <center>Sale ends soon</center>
  <FONT color="red">Hurry</FONT>
  <p>Contact sales@example.com</p>
  <a href="/plans">Compare all plans</a>
  <a href="https://twitter.com/acme">Follow Acme</a>
  <img src="/hero.png" alt="Hero" width="640" height="320">
</body>
</html>"#;

fn page() -> StaticPage {
    StaticPage::new(PAGE)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_navigation_timing(NavigationTiming {
            navigation_start: 0.0,
            load_event_end: 1250.0,
        })
        .with_stylesheet("/main.css", "@media (max-width: 600px) { h1 { font-size: 1rem } }")
}

fn probe() -> FakeProbe {
    FakeProbe::default()
        .with_status("https://example.com/sitemap.xml", 200)
        .with_status("https://example.com/robots.txt", 200)
        .with_status("https://example.com/ads.txt", 404)
        .with_body(
            "https://example.com/robots.txt",
            "User-agent: *\nDisallow: /admin\nDISALLOW: /tmp\nAllow: /",
        )
        .with_spf(Ok(Some("v=spf1 include:_spf.example.com ~all".to_string())))
}

async fn audit(page: StaticPage, probe: FakeProbe) -> Report {
    pipeline(page, probe).run(SITE).await.expect("audit succeeds")
}

fn as_object(report: &Report) -> serde_json::Map<String, Value> {
    match serde_json::to_value(report).expect("serialize report") {
        Value::Object(map) => map,
        other => panic!("report is not an object: {other}"),
    }
}

#[tokio::test]
async fn report_has_fixed_key_set_even_when_everything_fails() {
    let expected: Vec<&str> = std::iter::once("url")
        .chain(CheckKind::all().iter().flat_map(|k| k.fields().iter().copied()))
        .chain(std::iter::once("failed_checks"))
        .collect();

    for report in [
        audit(page(), probe()).await,
        audit(StaticPage::new(""), FakeProbe::default()).await,
    ] {
        let map = as_object(&report);
        assert_eq!(map.len(), expected.len());
        for key in &expected {
            assert!(map.contains_key(*key), "missing key {key}");
        }
    }
}

#[tokio::test]
async fn full_report_over_static_page() {
    let report = audit(page(), probe()).await;

    assert_eq!(report.url, "https://example.com/");
    assert_eq!(report.title.as_deref(), Some("Acme Pricing"));
    assert_eq!(report.h1s, Some(vec!["Pricing".to_string()]));
    assert_eq!(
        report.h2s,
        Some(vec!["Starter".to_string(), "Team".to_string()])
    );
    assert_eq!(report.meta_description.as_deref(), Some("Plans for every team"));
    assert_eq!(report.og_title.as_deref(), Some("Acme"));
    assert_eq!(report.has_sitemap, Some(true));
    assert_eq!(report.has_robots, Some(true));
    assert_eq!(report.has_ads, Some(false));
    assert_eq!(
        report.favicon.as_deref(),
        Some("https://example.com/favicon.ico")
    );
    assert_eq!(
        report.canonical_tag.as_deref(),
        Some("https://example.com/pricing")
    );
    assert_eq!(
        report.plaintext_emails,
        Some(vec!["sales@example.com".to_string()])
    );
    assert_eq!(
        report.socials,
        Some(vec!["https://twitter.com/acme".to_string()])
    );
    assert_eq!(report.has_doctype_declaration, Some(true));
    assert_eq!(report.media_query_responsive, Some(true));
    assert_eq!(
        report.dns_spf_record.as_record(),
        Some("v=spf1 include:_spf.example.com ~all")
    );
    assert!(report
        .load_time
        .as_deref()
        .is_some_and(|t| t.contains("Lisbon, Lisbon, PT")));
}

#[tokio::test]
async fn robots_disallow_keeps_original_casing() {
    let report = audit(page(), probe()).await;

    assert_eq!(
        report.disallow_directives,
        Some(vec!["Disallow: /admin".to_string(), "DISALLOW: /tmp".to_string()])
    );
}

#[tokio::test]
async fn deprecated_tags_match_exact_case() {
    let report = audit(page(), probe()).await;

    assert_eq!(report.deprecated_tags, Some(vec!["center".to_string()]));
}

#[tokio::test]
async fn failing_selector_only_affects_its_check() {
    let baseline = audit(page(), probe()).await;
    let broken = audit(page().with_failing_selector("h1"), probe()).await;

    assert!(broken.h1s.is_none());
    assert!(broken.h2s.is_none());
    assert!(broken.failed_checks.contains(&"headings".to_string()));
    assert!(!baseline.failed_checks.contains(&"headings".to_string()));

    let before = as_object(&baseline);
    let after = as_object(&broken);
    for (key, value) in &before {
        if matches!(key.as_str(), "h1s" | "h2s" | "failed_checks") {
            continue;
        }
        assert_eq!(after.get(key), Some(value), "field {key} changed");
    }
}

#[tokio::test]
async fn spf_failures_collapse_to_false() {
    let causes = [
        Ok(None),
        Err(ProbeError::NoRecords("example.com".into())),
        Err(ProbeError::NxDomain("example.com".into())),
        Err(ProbeError::Timeout(Duration::from_secs(5))),
    ];

    for cause in causes {
        let report = audit(page(), probe().with_spf(cause.clone())).await;
        assert_eq!(report.dns_spf_record, SpfField::Missing, "cause: {cause:?}");
        assert_eq!(report.field("dns_spf_record"), Some(json!(false)));
        assert!(!report.failed_checks.contains(&"spf".to_string()));
    }
}

#[tokio::test]
async fn link_friendliness_turns_false_on_any_bad_anchor() {
    let cases = [
        (r#"<a href="/a">Learn about pricing</a>"#.to_string(), true),
        (r#"<a href="/a">Learn about pricing</a><a href="/b"></a>"#.to_string(), false),
        (r#"<a href="/a">Learn about pricing</a><a href="/b">Click here</a>"#.to_string(), false),
        (
            format!(r#"<a href="/a">Learn about pricing</a><a href="/b">{}</a>"#, "x".repeat(61)),
            false,
        ),
    ];

    for (body, friendly) in cases {
        let html = format!("<html><body>{body}</body></html>");
        let report = audit(StaticPage::new(html), FakeProbe::default()).await;
        let links = report.non_seofriendly_links.expect("links check ran");
        assert_eq!(links.friend, friendly, "anchors: {body}");
    }
}

#[tokio::test]
async fn repeated_audits_are_identical() {
    let pipeline = pipeline(page(), probe());

    let first = pipeline.run(SITE).await.expect("first audit");
    let second = pipeline.run(SITE).await.expect("second audit");

    assert_eq!(first, second);
}

struct Unreachable;

#[async_trait]
impl PageProvider for Unreachable {
    async fn open(&self, target: &AuditTarget) -> seo_audit_lib::Result<Box<dyn OpenPage>> {
        Err(AuditError::navigation(
            target.as_str(),
            "net::ERR_NAME_NOT_RESOLVED",
        ))
    }
}

#[tokio::test]
async fn navigation_failure_aborts_the_audit() {
    let err = pipeline_with(Arc::new(Unreachable), probe())
        .run(SITE)
        .await
        .expect_err("unreachable page");

    assert!(err.is_fatal());
    assert!(matches!(err, AuditError::Navigation { .. }));
}

#[tokio::test]
async fn invalid_url_is_rejected_before_navigation() {
    let err = pipeline(page(), probe())
        .run("not a url")
        .await
        .expect_err("invalid url");

    assert!(matches!(err, AuditError::InvalidUrl { .. }));
}

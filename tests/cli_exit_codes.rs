use std::env;
use std::process::Command;
use tempfile::TempDir;

fn seo_audit() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seo-audit"));
    cmd.env_remove("RUST_LOG").env_remove("PORT");
    cmd
}

#[test]
fn audit_html_missing_file_exits_with_error_payload() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("missing.html");

    let output = seo_audit()
        .args([
            "audit-html",
            missing.to_str().expect("utf8 path"),
            "--url",
            "https://example.com",
        ])
        .output()
        .expect("run seo-audit");

    assert_eq!(output.status.code(), Some(2));
    let body: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("error payload on stdout");
    assert_eq!(body["mode"], "error");
    assert!(body["error"]["message"]
        .as_str()
        .is_some_and(|m| m.starts_with("IO error")));
}

#[test]
fn audit_html_rejects_invalid_url() {
    let dir = TempDir::new().expect("tempdir");
    let page = dir.path().join("page.html");
    std::fs::write(&page, "<html><head><title>t</title></head></html>").expect("write page");

    let output = seo_audit()
        .args([
            "audit-html",
            page.to_str().expect("utf8 path"),
            "--url",
            "example.com",
        ])
        .output()
        .expect("run seo-audit");

    assert_eq!(output.status.code(), Some(2));
    let body: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("error payload on stdout");
    assert_eq!(body["error"]["category"], "input");
}

#[test]
fn unknown_check_name_is_a_config_error() {
    let dir = TempDir::new().expect("tempdir");
    let page = dir.path().join("page.html");
    std::fs::write(&page, "<html></html>").expect("write page");

    let output = seo_audit()
        .args([
            "audit-html",
            page.to_str().expect("utf8 path"),
            "--url",
            "https://example.com",
            "--checks",
            "title,pagespeed",
        ])
        .output()
        .expect("run seo-audit");

    assert_eq!(output.status.code(), Some(2));
    let body: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("error payload on stdout");
    assert_eq!(body["error"]["category"], "config");
}

#[test]
fn broken_config_file_exits_with_error() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("seo.toml");
    std::fs::write(&cfg, "[timeouts]\nnavigation = \"soon\"\n").expect("write config");

    let status = seo_audit()
        .args([
            "--config",
            cfg.to_str().expect("utf8 path"),
            "audit",
            "https://example.com",
        ])
        .status()
        .expect("run seo-audit");

    assert_eq!(status.code(), Some(2));
}

#[test]
fn zero_nav_timeout_is_rejected() {
    let status = seo_audit()
        .args(["audit", "https://example.com", "--nav-timeout", "0"])
        .status()
        .expect("run seo-audit");

    assert_eq!(status.code(), Some(2));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let status = seo_audit().status().expect("run seo-audit");

    assert_eq!(status.code(), Some(2));
}

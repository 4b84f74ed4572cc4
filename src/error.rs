use crate::checks::CheckKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by the network probes (HEAD/GET requests and DNS lookups).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Probe timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Domain does not exist: {0}")]
    NxDomain(String),

    #[error("No records found for {0}")]
    NoRecords(String),

    #[error("HTTP probe failed: {0}")]
    Http(String),

    #[error("DNS resolution failed: {0}")]
    Resolve(String),
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Page query error: {0}")]
    Page(String),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Check '{check}' failed: {message}")]
    Check { check: CheckKind, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuditError {
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        AuditError::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        AuditError::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn check(check: CheckKind, message: impl Into<String>) -> Self {
        AuditError::Check {
            check,
            message: message.into(),
        }
    }

    pub fn page(message: impl Into<String>) -> Self {
        AuditError::Page(message.into())
    }

    /// Whether this error aborts a whole audit rather than a single check.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AuditError::Navigation { .. } | AuditError::InvalidUrl { .. } | AuditError::Browser(_)
        )
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            AuditError::Navigation { .. } => {
                let lower = self.to_string().to_ascii_lowercase();
                if lower.contains("timed out") || lower.contains("timeout") {
                    ErrorPayload::new(
                        ErrorCategory::Navigation,
                        self.to_string(),
                        "The page did not finish loading; increase timeouts.navigation or check that the site responds.",
                    )
                } else if lower.contains("name_not_resolved") || lower.contains("dns") {
                    ErrorPayload::new(
                        ErrorCategory::Navigation,
                        self.to_string(),
                        "The host could not be resolved; verify the domain name.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Navigation,
                        self.to_string(),
                        "Verify the URL is reachable from this machine and retry.",
                    )
                }
            }
            AuditError::InvalidUrl { .. } => ErrorPayload::new(
                ErrorCategory::Input,
                self.to_string(),
                "Provide an absolute http(s) URL (e.g., https://example.com).",
            ),
            AuditError::Browser(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("executable") || lower.contains("could not auto detect") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        self.to_string(),
                        "Install Chrome/Chromium or set browser.executable in the config file.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        self.to_string(),
                        "Re-run with --verbose; check that Chromium can start in this environment.",
                    )
                }
            }
            AuditError::Page(_) | AuditError::Check { .. } => ErrorPayload::new(
                ErrorCategory::Check,
                self.to_string(),
                "Inspect the page markup; the affected report fields are null.",
            ),
            AuditError::Probe(_) | AuditError::Network(_) => ErrorPayload::new(
                ErrorCategory::Network,
                self.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            AuditError::Io(_) => ErrorPayload::new(
                ErrorCategory::Config,
                self.to_string(),
                "Check file paths/permissions.",
            ),
            AuditError::Serialization(_) => ErrorPayload::new(
                ErrorCategory::Config,
                self.to_string(),
                "Check JSON inputs; run with --verbose for details.",
            ),
            AuditError::Config(_) => ErrorPayload::new(
                ErrorCategory::Config,
                self.to_string(),
                "Check the config file (TOML) and command-line flags.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Input,
    Navigation,
    Browser,
    Check,
    Network,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_timeout_payload_mentions_timeouts() {
        let err = AuditError::navigation("https://example.com", "timed out after 30s");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Navigation);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("timeouts.navigation"),
            "expected timeout remediation, got: {remediation}"
        );
    }

    #[test]
    fn navigation_dns_failure_payload_mentions_domain() {
        let err = AuditError::navigation("https://nope.invalid", "net::ERR_NAME_NOT_RESOLVED");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("domain"),
            "expected domain remediation, got: {remediation}"
        );
    }

    #[test]
    fn invalid_url_is_an_input_error() {
        let err = AuditError::invalid_url("example", "relative URL without a base");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Input);
        assert!(payload.message.contains("example"));
    }

    #[test]
    fn missing_browser_payload_mentions_executable() {
        let err = AuditError::Browser("Could not auto detect a chrome executable".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("browser.executable"),
            "expected executable remediation, got: {remediation}"
        );
    }

    #[test]
    fn only_session_errors_are_fatal() {
        assert!(AuditError::navigation("u", "m").is_fatal());
        assert!(AuditError::Browser("gone".into()).is_fatal());
        assert!(!AuditError::page("bad selector").is_fatal());
        assert!(!AuditError::from(ProbeError::NxDomain("x.invalid".into())).is_fatal());
        assert!(!AuditError::check(CheckKind::Favicon, "no href").is_fatal());
    }

    #[test]
    fn payload_serializes_camel_case_without_empty_remediation() {
        let payload = ErrorPayload {
            category: ErrorCategory::Network,
            message: "boom".into(),
            remediation: None,
        };
        let json = serde_json::to_string(&payload).expect("serialize payload");
        assert_eq!(json, r#"{"category":"network","message":"boom"}"#);
    }
}

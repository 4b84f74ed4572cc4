use url::Url;

use crate::{AuditError, Result};

/// A validated audit target: an absolute http(s) URL with a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    url: Url,
}

/// The same URL with its `www.` label toggled, used for the canonicalization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WwwVariant {
    pub url: String,
    pub host: String,
}

impl AuditTarget {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AuditError::invalid_url(value, "URL is empty"));
        }

        let url = Url::parse(trimmed).map_err(|e| AuditError::invalid_url(trimmed, e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AuditError::invalid_url(
                trimmed,
                format!("unsupported scheme '{}'; use http or https", url.scheme()),
            ));
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(AuditError::invalid_url(trimmed, "URL has no host")),
        }

        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Host without port, e.g. `example.com`.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Scheme, host and port with no trailing slash, e.g. `https://example.com`.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// `{origin}/{file}` for well-known root files such as `robots.txt`.
    pub fn root_file(&self, file: &str) -> String {
        format!("{}/{}", self.origin(), file.trim_start_matches('/'))
    }

    /// The same URL with `www.` inserted after the scheme, even when the host
    /// already starts with `www.`.
    pub fn www_variant(&self) -> WwwVariant {
        let variant_host = format!("www.{}", self.host());

        let mut variant = self.url.clone();
        // set_host only fails for cannot-be-a-base URLs, which parse() already rejected.
        let url = match variant.set_host(Some(&variant_host)) {
            Ok(()) => variant.to_string(),
            Err(_) => self.url.to_string(),
        };

        WwwVariant {
            url,
            host: variant_host,
        }
    }
}

impl std::fmt::Display for AuditTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

//! Out-of-band network probes against the audited origin: HEAD/GET requests,
//! IP resolution and SPF (DNS TXT) lookups.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client};
use tokio::time::timeout;

use crate::config::Config;
use crate::error::ProbeError;
use crate::{AuditError, Result};

/// Status and `Location` header of a HEAD request that did not follow redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: u16,
    pub location: Option<String>,
}

impl HeadResponse {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

#[async_trait]
pub trait NetworkProbe: Send + Sync {
    /// HEAD `url` without following redirects.
    async fn head(&self, url: &str) -> std::result::Result<HeadResponse, ProbeError>;

    async fn head_status(&self, url: &str) -> std::result::Result<u16, ProbeError> {
        Ok(self.head(url).await?.status)
    }

    /// GET `url` (following redirects) and return the body whatever the status.
    async fn get_text(&self, url: &str) -> std::result::Result<String, ProbeError>;

    async fn resolve_ip(&self, host: &str) -> std::result::Result<IpAddr, ProbeError>;

    /// The first TXT record of `domain` that declares `v=spf1`.
    /// `Ok(None)` when the domain has TXT records but none of them is SPF.
    async fn query_spf(&self, domain: &str) -> std::result::Result<Option<String>, ProbeError>;
}

/// Picks the SPF record out of a domain's TXT records.
pub fn spf_from_records<I, S>(records: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    records
        .into_iter()
        .find(|record| record.as_ref().contains("v=spf1"))
        .map(|record| record.as_ref().to_string())
}

/// [`NetworkProbe`] over reqwest and the system DNS resolver, every call bounded
/// by an explicit timeout.
#[derive(Clone)]
pub struct HttpProbe {
    head_client: Client,
    get_client: Client,
    resolver: TokioAsyncResolver,
    probe_timeout: Duration,
    dns_timeout: Duration,
}

impl HttpProbe {
    pub fn new(probe_timeout: Duration, dns_timeout: Duration) -> Result<Self> {
        let head_client = Client::builder()
            .timeout(probe_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(AuditError::Network)?;
        let get_client = Client::builder()
            .timeout(probe_timeout)
            .build()
            .map_err(AuditError::Network)?;

        let (config, mut opts) = hickory_resolver::system_conf::read_system_conf()
            .unwrap_or_else(|_| (ResolverConfig::default(), ResolverOpts::default()));
        opts.timeout = dns_timeout;
        opts.attempts = 1;
        let resolver = TokioAsyncResolver::tokio(config, opts);

        Ok(Self {
            head_client,
            get_client,
            resolver,
            probe_timeout,
            dns_timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.timeouts.probe, config.timeouts.dns)
    }

    fn http_error(&self, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout(self.probe_timeout)
        } else {
            ProbeError::Http(err.to_string())
        }
    }

    fn dns_error(&self, name: &str, err: ResolveError) -> ProbeError {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. }
                if *response_code == ResponseCode::NXDomain =>
            {
                ProbeError::NxDomain(name.to_string())
            }
            ResolveErrorKind::NoRecordsFound { .. } => ProbeError::NoRecords(name.to_string()),
            ResolveErrorKind::Timeout => ProbeError::Timeout(self.dns_timeout),
            _ => ProbeError::Resolve(err.to_string()),
        }
    }
}

#[async_trait]
impl NetworkProbe for HttpProbe {
    async fn head(&self, url: &str) -> std::result::Result<HeadResponse, ProbeError> {
        let response = self
            .head_client
            .head(url)
            .send()
            .await
            .map_err(|e| self.http_error(e))?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(HeadResponse {
            status: response.status().as_u16(),
            location,
        })
    }

    async fn get_text(&self, url: &str) -> std::result::Result<String, ProbeError> {
        let response = self
            .get_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.http_error(e))?;
        response.text().await.map_err(|e| self.http_error(e))
    }

    async fn resolve_ip(&self, host: &str) -> std::result::Result<IpAddr, ProbeError> {
        let lookup = timeout(self.dns_timeout, self.resolver.lookup_ip(host))
            .await
            .map_err(|_| ProbeError::Timeout(self.dns_timeout))?
            .map_err(|e| self.dns_error(host, e))?;
        lookup
            .iter()
            .next()
            .ok_or_else(|| ProbeError::NoRecords(host.to_string()))
    }

    async fn query_spf(&self, domain: &str) -> std::result::Result<Option<String>, ProbeError> {
        let lookup = timeout(self.dns_timeout, self.resolver.txt_lookup(domain))
            .await
            .map_err(|_| ProbeError::Timeout(self.dns_timeout))?
            .map_err(|e| self.dns_error(domain, e))?;

        // A long record is split into several character-strings; rejoin them.
        let records: Vec<String> = lookup
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|part| String::from_utf8_lossy(part).into_owned())
                    .collect::<String>()
            })
            .collect();
        Ok(spf_from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spf_record_is_found_among_other_txt_records() {
        let records = [
            "google-site-verification=abc",
            "v=spf1 include:_spf.google.com ~all",
        ];
        assert_eq!(
            spf_from_records(records),
            Some("v=spf1 include:_spf.google.com ~all".to_string())
        );
    }

    #[test]
    fn no_spf_when_no_record_declares_it() {
        assert_eq!(spf_from_records(["hello", "v=DMARC1; p=none"]), None);
        assert_eq!(spf_from_records(Vec::<String>::new()), None);
    }

    #[test]
    fn redirect_range_is_3xx_only() {
        let head = |status| HeadResponse {
            status,
            location: None,
        };
        assert!(head(301).is_redirect());
        assert!(head(308).is_redirect());
        assert!(!head(200).is_redirect());
        assert!(!head(400).is_redirect());
    }

    #[tokio::test]
    async fn builds_with_configured_timeouts() {
        let probe = HttpProbe::from_config(&Config::default()).expect("build probe");
        assert_eq!(probe.probe_timeout, Duration::from_secs(10));
        assert_eq!(probe.dns_timeout, Duration::from_secs(5));
    }
}

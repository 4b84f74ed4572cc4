//! Approximate location of the machine running the audit (not of the audited site),
//! used to put load times in context.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::{AuditError, Result};

#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// "City, Region, Country" for the caller's egress IP.
    async fn locate(&self) -> Result<String>;
}

#[derive(Debug, Default, Deserialize)]
struct IpInfo {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

impl IpInfo {
    fn describe(&self) -> String {
        format!(
            "{}, {}, {}",
            self.city.as_deref().unwrap_or("Unknown City"),
            self.region.as_deref().unwrap_or("Unknown Region"),
            self.country.as_deref().unwrap_or("Unknown Country"),
        )
    }
}

/// [`GeoLocator`] backed by an ipinfo.io-compatible JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpInfoLocator {
    http: Client,
    endpoint: String,
}

impl IpInfoLocator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AuditError::Network)?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.geo.endpoint.clone(), config.timeouts.probe)
    }
}

#[async_trait]
impl GeoLocator for IpInfoLocator {
    async fn locate(&self) -> Result<String> {
        let info: IpInfo = self
            .http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(info.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_city_region_country() {
        let info: IpInfo = serde_json::from_str(
            r#"{"ip":"203.0.113.9","city":"Lisbon","region":"Lisbon","country":"PT"}"#,
        )
        .expect("parse ipinfo");
        assert_eq!(info.describe(), "Lisbon, Lisbon, PT");
    }

    #[test]
    fn describe_fills_unknown_parts() {
        let info: IpInfo = serde_json::from_str(r#"{"country":"US"}"#).expect("parse ipinfo");
        assert_eq!(info.describe(), "Unknown City, Unknown Region, US");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let locator = IpInfoLocator::new("http://127.0.0.1:9/json", Duration::from_millis(500))
            .expect("build locator");
        assert!(locator.locate().await.is_err());
    }
}

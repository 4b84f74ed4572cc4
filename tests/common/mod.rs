//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use seo_audit_lib::{
    AttributeImageInspector, AuditPipeline, GeoLocator, HeadResponse, NetworkProbe, PageProvider,
    ProbeError, StaticPage, StaticPageProvider,
};

pub const SITE: &str = "https://example.com";

/// Probe answering from fixed tables; anything unknown is a connection error.
#[derive(Default, Clone)]
pub struct FakeProbe {
    heads: HashMap<String, HeadResponse>,
    bodies: HashMap<String, String>,
    spf: Option<Result<Option<String>, ProbeError>>,
}

impl FakeProbe {
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.heads.insert(
            url.to_string(),
            HeadResponse {
                status,
                location: None,
            },
        );
        self
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_spf(mut self, spf: Result<Option<String>, ProbeError>) -> Self {
        self.spf = Some(spf);
        self
    }
}

#[async_trait]
impl NetworkProbe for FakeProbe {
    async fn head(&self, url: &str) -> Result<HeadResponse, ProbeError> {
        self.heads
            .get(url)
            .cloned()
            .ok_or_else(|| ProbeError::Http(format!("connection refused: {url}")))
    }

    async fn get_text(&self, url: &str) -> Result<String, ProbeError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| ProbeError::Http(format!("connection refused: {url}")))
    }

    async fn resolve_ip(&self, host: &str) -> Result<IpAddr, ProbeError> {
        Err(ProbeError::NxDomain(host.to_string()))
    }

    async fn query_spf(&self, domain: &str) -> Result<Option<String>, ProbeError> {
        self.spf
            .clone()
            .unwrap_or_else(|| Err(ProbeError::NoRecords(domain.to_string())))
    }
}

pub struct FixedGeo;

#[async_trait]
impl GeoLocator for FixedGeo {
    async fn locate(&self) -> seo_audit_lib::Result<String> {
        Ok("Lisbon, Lisbon, PT".to_string())
    }
}

pub fn pipeline_with(pages: Arc<dyn PageProvider>, probe: FakeProbe) -> AuditPipeline {
    AuditPipeline::new(
        pages,
        Arc::new(probe),
        Arc::new(FixedGeo),
        Arc::new(AttributeImageInspector),
    )
}

pub fn pipeline(page: StaticPage, probe: FakeProbe) -> AuditPipeline {
    pipeline_with(Arc::new(StaticPageProvider::new(page)), probe)
}

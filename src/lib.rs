//! SEO Audit Library
//!
//! Loads one web page in a headless browser, runs a fixed battery of on-page
//! SEO and technical-health checks against it, and returns a single
//! fixed-shape [`Report`]. A check that fails leaves its own fields `null` and
//! never aborts the audit; only an unreachable page does.
//!
//! # Module Overview
//!
//! - [`pipeline`] - The audit pipeline and its per-check failure isolation
//! - [`checks`] - The check battery, [`CheckKind`] and [`Finding`]
//! - [`page`] - The [`PageHandle`] capability surface and the in-memory [`StaticPage`]
//! - [`browser`] - Chromium-backed pages over CDP
//! - [`probe`] - HEAD/GET and DNS probes against the audited origin
//! - [`geo`] - Location of the auditing host, for load-time context
//! - [`report`] - The report and its record types
//! - [`config`] - Configuration file support
//!
//! # Example
//!
//! ```no_run
//! use seo_audit_lib::{AuditPipeline, Config};
//!
//! # async fn example() -> seo_audit_lib::Result<()> {
//! let pipeline = AuditPipeline::from_config(&Config::default())?;
//! let report = pipeline.run("https://example.com").await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod checks;
pub mod config;
pub mod error;
pub mod geo;
pub mod images;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod probe;
pub mod report;
pub mod target;

pub use browser::{BrowserManager, BrowserOptions, PageSession, DEFAULT_NAVIGATION_TIMEOUT};
pub use checks::{default_checks, AuditContext, Check, CheckKind, Finding};
pub use config::Config;
pub use error::{AuditError, ErrorCategory, ErrorPayload, ProbeError, Result};
pub use geo::{GeoLocator, IpInfoLocator};
pub use images::{AttributeImageInspector, ImageInspector, ImageRecord};
pub use output::{ErrorOutput, AUDIT_OUTPUT_VERSION};
pub use page::{
    ElementSnapshot, NavigationTiming, OpenPage, PageHandle, PageProvider, ResourceTiming,
    StaticPage, StaticPageProvider,
};
pub use pipeline::AuditPipeline;
pub use probe::{HeadResponse, HttpProbe, NetworkProbe};
pub use report::{LinkInventory, LinkRecord, Report, SpfField};
pub use target::{AuditTarget, WwwVariant};

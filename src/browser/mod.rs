//! Headless Chromium sessions for live page audits.
//!
//! # Module Structure
//!
//! - [`manager`] - browser options and concurrency-limited session opening
//! - [`session`] - one browser process + page per audit, with scoped release
//! - `scripts` - the in-page expressions behind each page capability
//!
//! # Example
//!
//! ```no_run
//! use seo_audit_lib::{AuditTarget, BrowserManager, BrowserOptions, OpenPage, PageHandle};
//!
//! # async fn example() -> seo_audit_lib::Result<()> {
//! let manager = BrowserManager::new(BrowserOptions::default());
//! let target = AuditTarget::parse("https://example.com")?;
//! let mut session = manager.open_session(&target).await?;
//! println!("title: {}", session.title().await?);
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod manager;
mod scripts;
pub mod session;

pub use manager::{BrowserManager, BrowserOptions, DEFAULT_NAVIGATION_TIMEOUT};
pub use session::PageSession;

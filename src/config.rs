use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AuditError, Result};

pub const DEFAULT_GEO_ENDPOINT: &str = "https://ipinfo.io/json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timeouts: Timeouts,
    pub browser: BrowserSettings,
    pub server: ServerSettings,
    pub geo: GeoSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub navigation: Duration,
    #[serde(with = "humantime_serde")]
    pub probe: Duration,
    #[serde(with = "humantime_serde")]
    pub dns: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            probe: Duration::from_secs(10),
            dns: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub no_sandbox: bool,
    pub max_concurrent_sessions: usize,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            no_sandbox: false,
            max_concurrent_sessions: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoSettings {
    pub endpoint: String,
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit TOML file, or fall back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cfg = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| AuditError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("timeouts.navigation", self.timeouts.navigation),
            ("timeouts.probe", self.timeouts.probe),
            ("timeouts.dns", self.timeouts.dns),
        ] {
            if value.is_zero() {
                return Err(AuditError::Config(format!("{name} must be greater than zero")));
            }
        }
        if self.geo.endpoint.trim().is_empty() {
            return Err(AuditError::Config("geo.endpoint must not be empty".into()));
        }
        Ok(())
    }

    /// Apply the `PORT` environment variable, as hosting platforms set it.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        self
    }
}

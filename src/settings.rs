use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use seo_audit_lib::{default_checks, AuditError, Check, CheckKind, Config};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load config from a TOML file or return defaults, then apply `PORT`.
pub fn load_config(path: Option<&Path>) -> Result<Config, AuditError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());
        AuditError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;
    Ok(cfg.with_env_overrides())
}

/// Apply CLI overrides that take precedence over the config file.
pub fn apply_nav_timeout(mut config: Config, nav_timeout: Option<u64>) -> Result<Config, AuditError> {
    if let Some(secs) = nav_timeout {
        if secs == 0 {
            return Err(AuditError::Config(
                "--nav-timeout must be greater than zero".to_string(),
            ));
        }
        config.timeouts.navigation = Duration::from_secs(secs);
    }
    Ok(config)
}

/// The checks named on the command line, in report order; all when none are named.
pub fn select_checks(names: Option<&[String]>) -> Result<Vec<Box<dyn Check>>, AuditError> {
    let Some(names) = names.filter(|n| !n.is_empty()) else {
        return Ok(default_checks());
    };
    let wanted = names
        .iter()
        .map(|name| CheckKind::from_str(name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(default_checks()
        .into_iter()
        .filter(|check| wanted.contains(&check.kind()))
        .collect())
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: timeouts: nav={}s, probe={}s, dns={}s, browser: headless={}, max_sessions={}, server={}:{}, geo={}",
        config.timeouts.navigation.as_secs(),
        config.timeouts.probe.as_secs(),
        config.timeouts.dns.as_secs(),
        config.browser.headless,
        config.browser.max_concurrent_sessions,
        config.server.host,
        config.server.port,
        config.geo.endpoint,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_checks_defaults_to_everything() {
        assert_eq!(select_checks(None).expect("all").len(), CheckKind::all().len());
        assert_eq!(
            select_checks(Some(&[])).expect("all").len(),
            CheckKind::all().len()
        );
    }

    #[test]
    fn select_checks_keeps_report_order() {
        let names = vec!["spf".to_string(), "Title".to_string()];
        let kinds: Vec<CheckKind> = select_checks(Some(&names))
            .expect("known checks")
            .iter()
            .map(|c| c.kind())
            .collect();
        assert_eq!(kinds, [CheckKind::Title, CheckKind::Spf]);
    }

    #[test]
    fn select_checks_rejects_unknown_names() {
        let names = vec!["pagespeed".to_string()];
        let err = select_checks(Some(&names)).err().expect("unknown check");
        assert!(err.to_string().contains("Unknown check: pagespeed"));
    }

    #[test]
    fn nav_timeout_override() {
        let cfg = apply_nav_timeout(Config::default(), Some(7)).expect("override");
        assert_eq!(cfg.timeouts.navigation, Duration::from_secs(7));

        let cfg = apply_nav_timeout(Config::default(), None).expect("keep");
        assert_eq!(cfg.timeouts.navigation, Duration::from_secs(30));

        assert!(apply_nav_timeout(Config::default(), Some(0)).is_err());
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let summary = format_effective_config(&Config::default(), Some(Path::new("seo.toml")));
        assert!(summary.contains("nav=30s"));
        assert!(summary.contains("probe=10s"));
        assert!(summary.contains("dns=5s"));
        assert!(summary.contains("headless=true"));
        assert!(summary.contains("max_sessions=2"));
        assert!(summary.contains("0.0.0.0:"));
        assert!(summary.contains("seo.toml"));
    }
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use seo_audit_lib::{
    AttributeImageInspector, AuditError, AuditPipeline, Config, HttpProbe, IpInfoLocator,
    StaticPage, StaticPageProvider,
};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_report};
use crate::settings::{apply_nav_timeout, format_effective_config, load_config, select_checks};

/// Run the audit command against a live URL.
pub async fn run_audit(
    config_path: Option<PathBuf>,
    url: String,
    checks: Option<Vec<String>>,
    nav_timeout: Option<u64>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref())
        .and_then(|cfg| apply_nav_timeout(cfg, nav_timeout))
    {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    debug!("{}", format_effective_config(&config, config_path.as_deref()));

    let selected = match select_checks(checks.as_deref()) {
        Ok(selected) => selected,
        Err(err) => return render_error(err, format, output),
    };
    let pipeline = match AuditPipeline::from_config(&config) {
        Ok(pipeline) => pipeline.with_checks(selected),
        Err(err) => return render_error(err, format, output),
    };

    finish(pipeline, &url, format, output).await
}

/// Run the audit command against a local HTML file standing in for `url`.
pub async fn run_audit_html(
    config_path: Option<PathBuf>,
    file: PathBuf,
    url: String,
    content_type: Option<String>,
    checks: Option<Vec<String>>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    debug!("{}", format_effective_config(&config, config_path.as_deref()));

    let html = match tokio::fs::read_to_string(&file).await {
        Ok(html) => html,
        Err(err) => return render_error(AuditError::Io(err), format, output),
    };
    let mut page = StaticPage::new(html);
    if let Some(value) = content_type {
        page = page.with_header("content-type", value);
    }

    let selected = match select_checks(checks.as_deref()) {
        Ok(selected) => selected,
        Err(err) => return render_error(err, format, output),
    };
    let pipeline = match offline_pipeline(&config, page) {
        Ok(pipeline) => pipeline.with_checks(selected),
        Err(err) => return render_error(err, format, output),
    };

    finish(pipeline, &url, format, output).await
}

fn offline_pipeline(config: &Config, page: StaticPage) -> seo_audit_lib::Result<AuditPipeline> {
    Ok(AuditPipeline::new(
        Arc::new(StaticPageProvider::new(page)),
        Arc::new(HttpProbe::from_config(config)?),
        Arc::new(IpInfoLocator::from_config(config)?),
        Arc::new(AttributeImageInspector),
    ))
}

async fn finish(
    pipeline: AuditPipeline,
    url: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let report = match pipeline.run(url).await {
        Ok(report) => report,
        Err(err) => return render_error(err, format, output),
    };
    if let Err(err) = write_report(&report, format, output.clone()) {
        return render_error(err, format, output);
    }
    ExitCode::SUCCESS
}

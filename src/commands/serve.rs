use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use seo_audit_lib::{AuditError, AuditPipeline};
use tracing::{error, info};

use crate::cli::OutputFormat;
use crate::formatting::render_error;
use crate::server;
use crate::settings::{format_effective_config, load_config};

/// Run the HTTP server until it stops.
pub async fn run_serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> ExitCode {
    let mut config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, OutputFormat::Json, None),
    };
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    info!("{}", format_effective_config(&config, config_path.as_deref()));

    let pipeline = match AuditPipeline::from_config(&config) {
        Ok(pipeline) => Arc::new(pipeline),
        Err(err) => return render_error(err, OutputFormat::Json, None),
    };

    if let Err(err) = server::serve(pipeline, &config.server.host, config.server.port).await {
        error!(error = %err, "server stopped");
        return render_error(AuditError::Io(err), OutputFormat::Json, None);
    }
    ExitCode::SUCCESS
}

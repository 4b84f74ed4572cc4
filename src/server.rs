//! HTTP surface: `GET /` welcome and `POST /seo` audits.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use seo_audit_lib::{AuditError, AuditPipeline, ErrorOutput};

#[derive(Debug, Default, Deserialize)]
struct SeoRequest {
    url: Option<String>,
}

pub fn router(pipeline: Arc<AuditPipeline>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/seo", post(audit))
        .with_state(pipeline)
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(pipeline: Arc<AuditPipeline>, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("listening on {}:{}", host, port);
    axum::serve(listener, router(pipeline)).await
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "SEO audit service. POST {\"url\": \"https://...\"} to /seo."
    }))
}

async fn audit(State(pipeline): State<Arc<AuditPipeline>>, body: Bytes) -> Response {
    // Malformed bodies are treated like a missing url.
    let request: SeoRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return error_response(AuditError::invalid_url("", "request body must contain a url"));
    };

    match pipeline.run(url.trim()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            warn!(url = %url, error = %err, "audit aborted");
            error_response(err)
        }
    }
}

fn error_response(err: AuditError) -> Response {
    let status = match &err {
        AuditError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
        AuditError::Navigation { .. } | AuditError::Browser(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorOutput::from(&err))).into_response()
}

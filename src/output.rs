use serde::{Deserialize, Serialize};

use crate::error::{AuditError, ErrorPayload};

/// Schema version for error payloads.
pub const AUDIT_OUTPUT_VERSION: &str = "0.1.0";

/// Body returned instead of a report when an audit cannot run at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename = "error", rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

impl From<&AuditError> for ErrorOutput {
    fn from(err: &AuditError) -> Self {
        let error = err.to_payload();
        Self {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            message: Some(error.message.clone()),
            error,
        }
    }
}

use opshim_core::types::{ErrorFormat, PollState};
use serde_json::Value as JsonValue;

use crate::error::{OperationFailure, ServiceError};
use crate::http::HttpResponseParts;

/// Builds a [`ServiceError`] from a non-success response. Bodies that are not
/// JSON, or do not match the envelope, still yield the status and raw body.
pub fn classify_error(format: &ErrorFormat, resp: &HttpResponseParts) -> ServiceError {
    let raw_body = String::from_utf8_lossy(&resp.body).to_string();
    let Some(body) = resp.body_json() else {
        return ServiceError {
            status: resp.status,
            code: None,
            message: (!raw_body.trim().is_empty()).then(|| raw_body.trim().to_string()),
            target: None,
            details: Vec::new(),
            raw_body,
        };
    };

    ServiceError {
        status: resp.status,
        code: format.code(&body).map(json_text),
        message: format.message(&body).map(json_text),
        target: format.target(&body).map(json_text),
        details: format
            .details(&body)
            .and_then(|d| d.as_array().cloned())
            .unwrap_or_default(),
        raw_body,
    }
}

/// Failure carried by a terminal `Failed`/`Canceled` status body. The
/// operation's own `error` object is read with the command's format.
pub fn operation_failure(
    format: &ErrorFormat,
    state: PollState,
    body: Option<&JsonValue>,
    raw_body: &[u8],
) -> OperationFailure {
    let (code, message) = match body {
        Some(b) => (format.code(b).map(json_text), format.message(b).map(json_text)),
        None => (None, None),
    };
    OperationFailure {
        state,
        code,
        message,
        raw_body: String::from_utf8_lossy(raw_body).to_string(),
    }
}

fn json_text(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

use opshim_core::types::{ParamLocation, PollState};
use opshim_core::{BuildError, DecodeError};
use serde_json::Value as JsonValue;

use crate::http::HttpError;
use crate::lro::PollHandle;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Pre-flight: nothing was sent.
    #[error("missing required {location} parameter `{name}`")]
    MissingRequiredParameter { location: ParamLocation, name: String },
    #[error("invalid value for {location} parameter `{name}`: {reason}")]
    InvalidParameter {
        location: ParamLocation,
        name: String,
        reason: String,
    },
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Transport(#[from] HttpError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    OperationFailed(#[from] OperationFailure),
    #[error("failed to decode response: {0}")]
    Decode(#[from] DecodeError),
    #[error("unusable long-running-operation response: {0}")]
    BadLroResponse(String),
    /// The caller's cancel signal fired; the handle can be resumed later.
    #[error("polling cancelled after {} attempts", .handle.attempts)]
    Cancelled { handle: Box<PollHandle> },
    #[error("polling gave up after {attempts} attempts ({elapsed_ms} ms)")]
    PollTimeout {
        attempts: u32,
        elapsed_ms: u64,
        handle: Box<PollHandle>,
    },
}

impl From<BuildError> for EngineError {
    fn from(e: BuildError) -> Self {
        match e {
            BuildError::MissingRequiredParameter { location, name } => {
                EngineError::MissingRequiredParameter { location, name }
            }
            BuildError::InvalidParameterValue {
                location,
                name,
                reason,
            } => EngineError::InvalidParameter {
                location,
                name,
                reason,
            },
        }
    }
}

impl EngineError {
    /// Handle of an operation that is still running server-side.
    pub fn into_handle(self) -> Option<PollHandle> {
        match self {
            EngineError::Cancelled { handle } | EngineError::PollTimeout { handle, .. } => {
                Some(*handle)
            }
            _ => None,
        }
    }
}

/// Non-success response, shaped by the command's error format.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", self.render())]
pub struct ServiceError {
    pub status: u16,
    pub code: Option<String>,
    pub message: Option<String>,
    pub target: Option<String>,
    pub details: Vec<JsonValue>,
    pub raw_body: String,
}

impl ServiceError {
    /// Server message verbatim when present, else the status code.
    pub fn render(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("({code}) {message}"),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => format!("({code}) {}", status_text(self.status)),
            (None, None) => status_text(self.status),
        }
    }
}

/// The operation reached a terminal `Failed` or `Canceled` state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", self.render())]
pub struct OperationFailure {
    pub state: PollState,
    pub code: Option<String>,
    pub message: Option<String>,
    pub raw_body: String,
}

impl OperationFailure {
    pub fn render(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("({code}) {message}"),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => format!("({code}) operation {}", self.state.as_str().to_lowercase()),
            (None, None) => format!("operation {}", self.state.as_str().to_lowercase()),
        }
    }
}

fn status_text(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason());
    match reason {
        Some(r) => format!("operation returned status {status} ({r})"),
        None => format!("operation returned status {status}"),
    }
}

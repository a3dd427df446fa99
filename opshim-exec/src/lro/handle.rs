use std::time::Duration;

use opshim_core::types::{FinalStateVia, HttpMethod, PollState};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// How the status of a running operation is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PollStrategy {
    /// Status monitor from `Azure-AsyncOperation` / `Operation-Location`;
    /// state in the body's `status` field.
    AsyncOperation,
    /// `Location` header; 202 while running, 200/201/204 when done.
    Location,
    /// The resource itself; state in `properties.provisioningState`.
    ResourceBody,
}

/// Everything needed to resume tracking an operation: owned by the caller,
/// serializable so a no-wait invocation can be picked up later.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PollHandle {
    pub invocation_id: Uuid,
    pub command: String,
    pub method: HttpMethod,
    /// URL of the initial request.
    pub original_url: String,
    pub status_url: String,
    pub strategy: PollStrategy,
    /// Last `Location` header seen, for `final-state-via: location`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_url: Option<String>,
    pub final_state_via: FinalStateVia,
    pub state: PollState,
    /// Polls issued so far.
    #[serde(default)]
    pub attempts: u32,
    /// Latest server delay hint, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
    /// Body of the latest response, kept for final states that live in it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_body: Option<JsonValue>,
}

impl PollHandle {
    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after_ms.map(Duration::from_millis)
    }
}

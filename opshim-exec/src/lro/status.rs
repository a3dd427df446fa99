use std::time::SystemTime;

use opshim_core::types::{FinalStateVia, HttpMethod, PollState};
use serde_json::Value as JsonValue;

use crate::config::PollConfig;
use crate::error::EngineError;
use crate::http::HttpResponseParts;
use crate::lro::classify::resolve_header;
use crate::lro::delay::parse_retry_after;
use crate::lro::handle::{PollHandle, PollStrategy};
use crate::lro::{AZURE_ASYNC_OPERATION, LOCATION, OPERATION_LOCATION};

pub(crate) fn provisioning_state(body: &JsonValue) -> Option<PollState> {
    body.get("properties")?
        .get("provisioningState")?
        .as_str()
        .map(PollState::parse)
}

/// Operation state carried by a successful poll response.
pub fn read_poll_state(
    strategy: PollStrategy,
    resp: &HttpResponseParts,
) -> Result<PollState, EngineError> {
    match strategy {
        PollStrategy::AsyncOperation => {
            let body = resp.body_json().ok_or_else(|| {
                EngineError::BadLroResponse("status monitor response is not JSON".to_string())
            })?;
            body.get("status")
                .and_then(JsonValue::as_str)
                .map(PollState::parse)
                .ok_or_else(|| {
                    EngineError::BadLroResponse(
                        "status monitor response has no `status` field".to_string(),
                    )
                })
        }
        PollStrategy::Location => Ok(if resp.status == 202 {
            PollState::Running
        } else {
            PollState::Succeeded
        }),
        // No provisioning state on the resource means there is nothing left to wait for.
        PollStrategy::ResourceBody => Ok(resp
            .body_json()
            .as_ref()
            .and_then(provisioning_state)
            .unwrap_or(PollState::Succeeded)),
    }
}

/// Folds one successful poll response into the handle.
pub fn apply_poll_response(
    handle: &mut PollHandle,
    resp: &HttpResponseParts,
    poll: &PollConfig,
    now: SystemTime,
) -> Result<PollState, EngineError> {
    let state = read_poll_state(handle.strategy, resp)?;
    let status_url = url::Url::parse(&handle.status_url)
        .map_err(|e| EngineError::BadLroResponse(format!("invalid status url: {e}")))?;

    if let Some(loc) = resolve_header(resp, &status_url, LOCATION) {
        handle.location_url = Some(loc.to_string());
    }
    // The server may move the status monitor between polls.
    let moved = match handle.strategy {
        PollStrategy::AsyncOperation => resolve_header(resp, &status_url, AZURE_ASYNC_OPERATION)
            .or_else(|| resolve_header(resp, &status_url, OPERATION_LOCATION)),
        PollStrategy::Location => resolve_header(resp, &status_url, LOCATION),
        PollStrategy::ResourceBody => None,
    };
    if let Some(u) = moved {
        handle.status_url = u.to_string();
    }

    handle.retry_after_ms =
        parse_retry_after(&resp.headers, &poll.vendor_headers, now).map(|d| d.as_millis() as u64);
    handle.last_body = resp.body_json();
    handle.state = state;
    Ok(state)
}

/// Where the final resource representation lives after success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalSource {
    /// GET this URL and decode its body.
    Get(String),
    /// Decode the body of the last poll response.
    LastBody,
    /// The operation produces no resource (e.g. a delete).
    Nothing,
}

pub fn final_source(handle: &PollHandle) -> FinalSource {
    let method = handle.method;
    let resource_url = || {
        if method.targets_resource() {
            FinalSource::Get(handle.original_url.clone())
        } else if method == HttpMethod::Delete {
            FinalSource::Nothing
        } else {
            match (&handle.last_body, &handle.location_url) {
                (None, Some(loc)) => FinalSource::Get(loc.clone()),
                _ => FinalSource::LastBody,
            }
        }
    };

    match handle.strategy {
        // Polling the resource itself, or a Location that answers with it.
        PollStrategy::ResourceBody => FinalSource::LastBody,
        // The terminal poll response is the result; the status URL is never
        // fetched again.
        PollStrategy::Location => {
            if handle.last_body.is_some() {
                FinalSource::LastBody
            } else if method.targets_resource() {
                FinalSource::Get(handle.original_url.clone())
            } else {
                FinalSource::Nothing
            }
        }
        PollStrategy::AsyncOperation => match handle.final_state_via {
            FinalStateVia::AzureAsyncOperation => resource_url(),
            FinalStateVia::OriginalUri => {
                if method == HttpMethod::Delete {
                    FinalSource::Nothing
                } else {
                    FinalSource::Get(handle.original_url.clone())
                }
            }
            FinalStateVia::Location => match &handle.location_url {
                Some(loc) => FinalSource::Get(loc.clone()),
                None => resource_url(),
            },
            FinalStateVia::OperationLocation => {
                let resource_location = handle
                    .last_body
                    .as_ref()
                    .and_then(|b| b.get("resourceLocation"))
                    .and_then(JsonValue::as_str);
                match resource_location {
                    Some(loc) => FinalSource::Get(loc.to_string()),
                    None => FinalSource::LastBody,
                }
            }
        },
    }
}

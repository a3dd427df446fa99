use std::time::SystemTime;

use opshim_core::types::PollState;
use opshim_core::Command;
use uuid::Uuid;

use crate::config::PollConfig;
use crate::error::EngineError;
use crate::http::HttpResponseParts;
use crate::lro::delay::parse_retry_after;
use crate::lro::handle::{PollHandle, PollStrategy};
use crate::lro::status::provisioning_state;
use crate::lro::{AZURE_ASYNC_OPERATION, LOCATION, OPERATION_LOCATION};

/// Path taken after the initial response.
#[derive(Debug)]
pub enum Triage {
    /// Decode this response now.
    Complete,
    /// Asynchronous: track the operation with this handle.
    Poll(PollHandle),
    /// Not a success status for this command; hand to the error classifier.
    Error,
}

/// Decides the path for the initial response according to the command's
/// status routing.
pub fn triage_initial(
    cmd: &Command,
    request_url: &url::Url,
    resp: &HttpResponseParts,
    invocation_id: Uuid,
    poll: &PollConfig,
    now: SystemTime,
) -> Result<Triage, EngineError> {
    let lro = &cmd.lro;
    let status = resp.status;

    let make_handle = |strategy: PollStrategy, status_url: url::Url| PollHandle {
        invocation_id,
        command: cmd.name.clone(),
        method: cmd.template.method,
        original_url: request_url.to_string(),
        status_url: status_url.to_string(),
        strategy,
        location_url: resolve_header(resp, request_url, LOCATION).map(|u| u.to_string()),
        final_state_via: lro.final_state_via,
        state: PollState::Running,
        attempts: 0,
        retry_after_ms: parse_retry_after(&resp.headers, &poll.vendor_headers, now)
            .map(|d| d.as_millis() as u64),
        last_body: resp.body_json(),
    };

    if lro.is_async_status(status) {
        return match async_marker(resp, request_url, true) {
            Some((strategy, url)) => Ok(Triage::Poll(make_handle(strategy, url))),
            None => Err(EngineError::BadLroResponse(format!(
                "status {status} without an operation status url"
            ))),
        };
    }

    if !lro.is_sync_status(status) {
        return Ok(Triage::Error);
    }
    if !lro.enabled {
        return Ok(Triage::Complete);
    }

    // A 201 may point at the resource being created with `Location`.
    if let Some((strategy, url)) = async_marker(resp, request_url, status == 201) {
        return Ok(Triage::Poll(make_handle(strategy, url)));
    }

    if cmd.template.method.targets_resource() {
        let running = resp
            .body_json()
            .as_ref()
            .and_then(provisioning_state)
            .is_some_and(|s| !s.is_terminal());
        if running {
            return Ok(Triage::Poll(make_handle(
                PollStrategy::ResourceBody,
                request_url.clone(),
            )));
        }
    }

    Ok(Triage::Complete)
}

fn async_marker(
    resp: &HttpResponseParts,
    request_url: &url::Url,
    allow_location: bool,
) -> Option<(PollStrategy, url::Url)> {
    if let Some(u) = resolve_header(resp, request_url, AZURE_ASYNC_OPERATION) {
        return Some((PollStrategy::AsyncOperation, u));
    }
    if let Some(u) = resolve_header(resp, request_url, OPERATION_LOCATION) {
        return Some((PollStrategy::AsyncOperation, u));
    }
    if allow_location {
        if let Some(u) = resolve_header(resp, request_url, LOCATION) {
            return Some((PollStrategy::Location, u));
        }
    }
    None
}

/// Header value as an absolute URL; relative values resolve against `base`.
pub(crate) fn resolve_header(
    resp: &HttpResponseParts,
    base: &url::Url,
    name: &str,
) -> Option<url::Url> {
    let raw = resp.header(name)?.trim();
    if raw.is_empty() {
        return None;
    }
    base.join(raw).ok()
}

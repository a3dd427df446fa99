use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use opshim_core::types::PollState;

use crate::lro::DelayReason;

#[derive(Debug, Clone)]
pub enum Event {
    InvocationStarted {
        invocation_id: Uuid,
        command: String,
    },
    RequestSent {
        invocation_id: Uuid,
        method: String,
        url: String,
    },
    ResponseReceived {
        invocation_id: Uuid,
        status: u16,
    },
    PollScheduled {
        invocation_id: Uuid,
        attempt_no: u32,
        delay_ms: u64,
        reason: DelayReason,
    },
    PollCompleted {
        invocation_id: Uuid,
        attempt_no: u32,
        state: PollState,
    },
    InvocationFinished {
        invocation_id: Uuid,
        outcome: Outcome,
    },
}

/// How an invocation ended, as far as events are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Returned to the caller with the operation still running.
    Pending,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Pending => "pending",
            Outcome::Failed => "failed",
        }
    }
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::InvocationStarted { .. } => "invocation.started",
            Event::RequestSent { .. } => "request.sent",
            Event::ResponseReceived { .. } => "response.received",
            Event::PollScheduled { .. } => "poll.scheduled",
            Event::PollCompleted { .. } => "poll.completed",
            Event::InvocationFinished { .. } => "invocation.finished",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let kind = self.kind();
        match self {
            Event::InvocationStarted {
                invocation_id,
                command,
            } => json!({ "type": kind, "invocation_id": invocation_id.to_string(), "command": command }),
            Event::RequestSent {
                invocation_id,
                method,
                url,
            } => json!({ "type": kind, "invocation_id": invocation_id.to_string(), "method": method, "url": url }),
            Event::ResponseReceived {
                invocation_id,
                status,
            } => json!({ "type": kind, "invocation_id": invocation_id.to_string(), "status": status }),
            Event::PollScheduled {
                invocation_id,
                attempt_no,
                delay_ms,
                reason,
            } => json!({
                "type": kind,
                "invocation_id": invocation_id.to_string(),
                "attempt_no": attempt_no,
                "delay_ms": delay_ms,
                "reason": reason.as_str()
            }),
            Event::PollCompleted {
                invocation_id,
                attempt_no,
                state,
            } => json!({
                "type": kind,
                "invocation_id": invocation_id.to_string(),
                "attempt_no": attempt_no,
                "state": state.as_str()
            }),
            Event::InvocationFinished {
                invocation_id,
                outcome,
            } => json!({ "type": kind, "invocation_id": invocation_id.to_string(), "outcome": outcome.as_str() }),
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!(
            "{}",
            serde_json::to_string(&event.to_json()).unwrap_or_default()
        );
    }
}

/// Forwards events to `tracing` at debug level.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        tracing::debug!(target: "opshim::events", kind = event.kind(), event = %event.to_json());
    }
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

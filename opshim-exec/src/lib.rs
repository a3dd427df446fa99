#![forbid(unsafe_code)]

//! Runtime for opshim commands: builds requests, sends them through an
//! [`HttpClient`], follows long-running operations and decodes the result.

pub mod config;
pub mod engine;
pub mod error;
pub mod error_format;
pub mod events;
pub mod http;
pub mod lro;
pub mod request;

pub use crate::config::{DelayVendorHeader, EngineConfig, PollConfig, PollLimits, VendorHeaderKind};
pub use crate::engine::{Completion, Engine, InvokeOptions, OperationResult};
pub use crate::error::{EngineError, OperationFailure, ServiceError};
pub use crate::events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, Outcome, StdoutEventSink, TracingEventSink,
};
pub use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use crate::lro::{PollHandle, PollStrategy};

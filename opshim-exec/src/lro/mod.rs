//! Long-running-operation support: triage of the initial response, the
//! caller-owned poll handle, per-poll state updates and the delay policy.

mod classify;
mod delay;
mod handle;
mod status;

pub use classify::{triage_initial, Triage};
pub use delay::{next_poll_delay, parse_retry_after, DelayReason, PollDelay};
pub use handle::{PollHandle, PollStrategy};
pub use status::{apply_poll_response, final_source, read_poll_state, FinalSource};

pub(crate) const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";
pub(crate) const OPERATION_LOCATION: &str = "operation-location";
pub(crate) const LOCATION: &str = "location";

use std::future::Future;
use std::sync::Arc;
use std::time::SystemTime;

use opshim_core::types::PollState;
use opshim_core::{decode_bytes, Arguments, Command, Decoded};
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::error_format::{classify_error, operation_failure};
use crate::events::{Event, EventSink, NoOpEventSink, Outcome};
use crate::http::{HttpClient, HttpRequestParts, HttpResponseParts};
use crate::lro::{
    apply_poll_response, final_source, next_poll_delay, triage_initial, FinalSource, PollHandle,
    Triage,
};
use crate::request::{build_request, get_request};

/// Result of sending a command once, before any polling.
#[derive(Debug)]
pub enum OperationResult {
    /// Synchronous success, already decoded.
    Immediate(Decoded),
    /// The server accepted the request and is still working on it.
    Polling(PollHandle),
    Failed(EngineError),
}

impl OperationResult {
    pub fn into_result(self) -> Result<Completion, EngineError> {
        match self {
            OperationResult::Immediate(d) => Ok(Completion::Completed(d)),
            OperationResult::Polling(h) => Ok(Completion::Pending(h)),
            OperationResult::Failed(e) => Err(e),
        }
    }
}

#[derive(Debug)]
pub enum Completion {
    Completed(Decoded),
    /// Only with `no_wait`: the handle to resume from.
    Pending(PollHandle),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InvokeOptions {
    /// Return after the initial response instead of polling to completion.
    pub no_wait: bool,
}

/// Drives commands over an [`HttpClient`]. Holds no per-invocation state, so
/// one engine serves any number of concurrent invocations.
pub struct Engine {
    http: Arc<dyn HttpClient>,
    config: EngineConfig,
    events: Arc<dyn EventSink>,
}

impl Engine {
    pub fn new(http: Arc<dyn HttpClient>, config: EngineConfig) -> Self {
        Self {
            http,
            config,
            events: Arc::new(NoOpEventSink),
        }
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds and sends the request, then triages the first response.
    /// Never polls.
    pub async fn submit(&self, cmd: &Command, args: &Arguments) -> OperationResult {
        let invocation_id = Uuid::new_v4();
        self.events
            .emit(Event::InvocationStarted {
                invocation_id,
                command: cmd.name.clone(),
            })
            .await;

        let result = match self.submit_inner(invocation_id, cmd, args).await {
            Ok(r) => r,
            Err(e) => OperationResult::Failed(e),
        };
        match &result {
            OperationResult::Immediate(_) => self.finished(invocation_id, Outcome::Completed).await,
            OperationResult::Failed(_) => self.finished(invocation_id, Outcome::Failed).await,
            OperationResult::Polling(_) => {}
        }
        result
    }

    async fn submit_inner(
        &self,
        invocation_id: Uuid,
        cmd: &Command,
        args: &Arguments,
    ) -> Result<OperationResult, EngineError> {
        let req = build_request(&self.config, &cmd.template, args)?;
        let request_url = req.url.clone();
        let resp = self.send(invocation_id, req).await?;

        match triage_initial(
            cmd,
            &request_url,
            &resp,
            invocation_id,
            &self.config.poll,
            SystemTime::now(),
        )? {
            Triage::Complete => Ok(OperationResult::Immediate(decode_bytes(
                cmd.response.as_ref(),
                &resp.body,
            )?)),
            Triage::Poll(handle) => {
                tracing::debug!(
                    command = %cmd.name,
                    strategy = ?handle.strategy,
                    status_url = %handle.status_url,
                    "operation accepted; polling required"
                );
                Ok(OperationResult::Polling(handle))
            }
            Triage::Error => Err(classify_error(&cmd.error_format, &resp).into()),
        }
    }

    /// Submits, then polls to completion unless `no_wait` is set.
    pub async fn invoke(
        &self,
        cmd: &Command,
        args: &Arguments,
        opts: InvokeOptions,
    ) -> Result<Completion, EngineError> {
        match self.submit(cmd, args).await {
            OperationResult::Immediate(d) => Ok(Completion::Completed(d)),
            OperationResult::Polling(handle) if opts.no_wait => {
                self.finished(handle.invocation_id, Outcome::Pending).await;
                Ok(Completion::Pending(handle))
            }
            OperationResult::Polling(handle) => self.wait(cmd, handle).await.map(Completion::Completed),
            OperationResult::Failed(e) => Err(e),
        }
    }

    /// Issues exactly one poll and folds its answer into `handle`. A handle
    /// that is already terminal is left alone.
    pub async fn poll_once(
        &self,
        cmd: &Command,
        handle: &mut PollHandle,
    ) -> Result<PollState, EngineError> {
        if handle.is_done() {
            return Ok(handle.state);
        }
        let url = url::Url::parse(&handle.status_url)
            .map_err(|e| EngineError::BadLroResponse(format!("invalid status url: {e}")))?;
        let resp = self
            .send(handle.invocation_id, get_request(&self.config, url))
            .await?;
        handle.attempts += 1;

        if !resp.is_success() {
            return Err(classify_error(&cmd.error_format, &resp).into());
        }
        let state = apply_poll_response(handle, &resp, &self.config.poll, SystemTime::now())?;
        self.events
            .emit(Event::PollCompleted {
                invocation_id: handle.invocation_id,
                attempt_no: handle.attempts,
                state,
            })
            .await;
        Ok(state)
    }

    /// Polls until the operation is terminal, then resolves and decodes the
    /// final resource.
    pub async fn wait(&self, cmd: &Command, handle: PollHandle) -> Result<Decoded, EngineError> {
        self.wait_with_cancel(cmd, handle, std::future::pending::<()>())
            .await
    }

    /// Like [`Engine::wait`], but stops at the next suspension point once
    /// `cancel` resolves. The error carries the handle for later resumption.
    pub async fn wait_with_cancel<F>(
        &self,
        cmd: &Command,
        handle: PollHandle,
        cancel: F,
    ) -> Result<Decoded, EngineError>
    where
        F: Future<Output = ()>,
    {
        let invocation_id = handle.invocation_id;
        let result = self.wait_inner(cmd, handle, cancel).await;
        let outcome = match &result {
            Ok(_) => Outcome::Completed,
            Err(EngineError::Cancelled { .. } | EngineError::PollTimeout { .. }) => Outcome::Pending,
            Err(_) => Outcome::Failed,
        };
        self.finished(invocation_id, outcome).await;
        result
    }

    async fn wait_inner<F>(
        &self,
        cmd: &Command,
        mut handle: PollHandle,
        cancel: F,
    ) -> Result<Decoded, EngineError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let limits = self.config.limits;
        let started = Instant::now();
        let mut polled = 0u32;

        while !handle.is_done() {
            let delay = next_poll_delay(
                &self.config.poll,
                handle.attempts,
                handle.retry_after(),
                || fastrand::u64(..),
            );

            let attempts_exhausted = limits.max_attempts.is_some_and(|max| polled >= max);
            let out_of_time = limits
                .max_duration
                .is_some_and(|max| started.elapsed() + delay.delay > max);
            if attempts_exhausted || out_of_time {
                tracing::warn!(
                    command = %cmd.name,
                    attempts = handle.attempts,
                    "poll limit reached; operation still running"
                );
                return Err(EngineError::PollTimeout {
                    attempts: handle.attempts,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    handle: Box::new(handle),
                });
            }

            self.events
                .emit(Event::PollScheduled {
                    invocation_id: handle.invocation_id,
                    attempt_no: handle.attempts + 1,
                    delay_ms: delay.delay.as_millis() as u64,
                    reason: delay.reason,
                })
                .await;

            let slept = tokio::select! {
                _ = &mut cancel => false,
                _ = tokio::time::sleep(delay.delay) => true,
            };
            if !slept {
                return Err(EngineError::Cancelled {
                    handle: Box::new(handle),
                });
            }

            let polled_state = tokio::select! {
                _ = &mut cancel => None,
                r = self.poll_once(cmd, &mut handle) => Some(r),
            };
            match polled_state {
                None => {
                    return Err(EngineError::Cancelled {
                        handle: Box::new(handle),
                    })
                }
                Some(r) => {
                    r?;
                }
            }
            polled += 1;
        }

        self.finish(cmd, &handle).await
    }

    /// Final step for a terminal handle: decode the resource on success, or
    /// surface the operation's failure.
    pub async fn finish(&self, cmd: &Command, handle: &PollHandle) -> Result<Decoded, EngineError> {
        match handle.state {
            PollState::Succeeded => {}
            PollState::Failed | PollState::Canceled => {
                let raw = handle
                    .last_body
                    .as_ref()
                    .map(|b| b.to_string().into_bytes())
                    .unwrap_or_default();
                return Err(operation_failure(
                    &cmd.error_format,
                    handle.state,
                    handle.last_body.as_ref(),
                    &raw,
                )
                .into());
            }
            PollState::Running => {
                return Err(EngineError::BadLroResponse(
                    "operation has not reached a terminal state".to_string(),
                ))
            }
        }

        match final_source(handle) {
            FinalSource::Nothing => Ok(Decoded::empty()),
            FinalSource::LastBody => {
                let raw = handle
                    .last_body
                    .as_ref()
                    .map(|b| b.to_string().into_bytes())
                    .unwrap_or_default();
                Ok(decode_bytes(cmd.response.as_ref(), &raw)?)
            }
            FinalSource::Get(target) => {
                let base = url::Url::parse(&handle.original_url)
                    .map_err(|e| EngineError::InvalidUrl(e.to_string()))?;
                let url = base
                    .join(&target)
                    .map_err(|e| EngineError::BadLroResponse(format!("invalid final url: {e}")))?;
                let resp = self
                    .send(handle.invocation_id, get_request(&self.config, url))
                    .await?;
                if !resp.is_success() {
                    return Err(classify_error(&cmd.error_format, &resp).into());
                }
                Ok(decode_bytes(cmd.response.as_ref(), &resp.body)?)
            }
        }
    }

    async fn send(
        &self,
        invocation_id: Uuid,
        req: HttpRequestParts,
    ) -> Result<HttpResponseParts, EngineError> {
        self.events
            .emit(Event::RequestSent {
                invocation_id,
                method: req.method.clone(),
                url: req.url.to_string(),
            })
            .await;
        tracing::debug!(method = %req.method, url = %req.url, "sending request");

        let resp = self
            .http
            .send(req, self.config.timeout, self.config.max_response_bytes)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "transport error");
                EngineError::Transport(e)
            })?;

        self.events
            .emit(Event::ResponseReceived {
                invocation_id,
                status: resp.status,
            })
            .await;
        Ok(resp)
    }

    async fn finished(&self, invocation_id: Uuid, outcome: Outcome) {
        self.events
            .emit(Event::InvocationFinished {
                invocation_id,
                outcome,
            })
            .await;
    }
}

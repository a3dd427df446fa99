use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use opshim_core::registry::install;
use opshim_core::{parse_definitions_str, Arguments, Command, DocumentFormat, ParsedDefinitions, Registry};
use opshim_exec::{
    Completion, EngineConfig, EngineError, EventSink, HttpClient, NoOpEventSink, PollHandle,
    ReqwestHttpClient, StdoutEventSink, TracingEventSink,
};
use serde_json::{Map, Value as JsonValue};

use crate::exit_codes;
use crate::output::{print_error, print_result};
use crate::{CommandArgs, EngineArgs, OutputArgs, PollArgs};

pub fn load_definitions(path: &Path, output: &OutputArgs) -> Result<ParsedDefinitions, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to read {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })?;

    parse_definitions_str(&content, DocumentFormat::Auto).map_err(|e| {
        print_error(output.format, output.quiet, &format!("{e}"));
        exit_codes::VALIDATION_FAILED
    })
}

/// Merges the args file and `--arg` values (later wins) into one argument set.
pub fn build_arguments(args: &CommandArgs, output: &OutputArgs) -> Result<Arguments, i32> {
    let mut root = Map::new();

    if let Some(path) = &args.args_file {
        let content = std::fs::read_to_string(path).map_err(|e| {
            print_error(output.format, output.quiet, &format!("failed to read arguments: {e}"));
            exit_codes::RUNTIME_ERROR
        })?;
        let parsed: Option<JsonValue> = serde_json::from_str(&content)
            .ok()
            .or_else(|| serde_yaml::from_str(&content).ok());
        match parsed {
            Some(JsonValue::Object(map)) => root = map,
            _ => {
                print_error(
                    output.format,
                    output.quiet,
                    "arguments file must hold a JSON or YAML object",
                );
                return Err(exit_codes::VALIDATION_FAILED);
            }
        }
    }

    for s in &args.set_args {
        let (k, v) = split_pair(s, "--arg", output)?;
        let value = serde_json::from_str(v).unwrap_or_else(|_| JsonValue::String(v.to_string()));
        set_dotted(&mut root, k, value);
    }

    Ok(root.into_iter().collect())
}

fn split_pair<'a>(s: &'a str, flag: &str, output: &OutputArgs) -> Result<(&'a str, &'a str), i32> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k, v)),
        _ => {
            print_error(
                output.format,
                output.quiet,
                &format!("{flag} expects NAME=VALUE, got `{s}`"),
            );
            Err(exit_codes::VALIDATION_FAILED)
        }
    }
}

fn set_dotted(root: &mut Map<String, JsonValue>, key: &str, value: JsonValue) {
    let mut parts = key.split('.').peekable();
    let mut map = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return;
        }
        let slot = map
            .entry(part.to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        if !slot.is_object() {
            *slot = JsonValue::Object(Map::new());
        }
        let JsonValue::Object(next) = slot else {
            return;
        };
        map = next;
    }
}

pub fn build_engine_config(
    engine: &EngineArgs,
    poll: &PollArgs,
    output: &OutputArgs,
) -> Result<EngineConfig, i32> {
    let mut config = EngineConfig::default().with_base_url(engine.base_url.clone());
    config.timeout = Duration::from_millis(engine.timeout);
    config.max_response_bytes = engine.max_response_bytes;
    for h in &engine.headers {
        let (k, v) = split_pair(h, "--header", output)?;
        config.default_headers.insert(k.to_string(), v.to_string());
    }

    if let Some(secs) = poll.poll_interval {
        config.poll.default_interval = Duration::from_secs(secs);
    }
    config.limits.max_attempts = poll.max_poll_attempts;
    config.limits.max_duration = poll.poll_timeout.map(Duration::from_secs);
    Ok(config)
}

pub fn build_http_client(output: &OutputArgs) -> Result<Arc<dyn HttpClient>, i32> {
    match ReqwestHttpClient::try_default() {
        Ok(c) => Ok(Arc::new(c)),
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to create HTTP client: {e}"),
            );
            Err(exit_codes::RUNTIME_ERROR)
        }
    }
}

pub fn build_event_sink(events: &str, output: &OutputArgs) -> Result<Arc<dyn EventSink>, i32> {
    match events {
        "none" => Ok(Arc::new(NoOpEventSink)),
        "stdout" => Ok(Arc::new(StdoutEventSink)),
        "tracing" => Ok(Arc::new(TracingEventSink)),
        _ => {
            print_error(
                output.format,
                output.quiet,
                &format!("unknown event sink: {events}"),
            );
            Err(exit_codes::RUNTIME_ERROR)
        }
    }
}

pub fn exit_code_for(err: &EngineError) -> i32 {
    match err {
        EngineError::MissingRequiredParameter { .. } | EngineError::InvalidParameter { .. } => {
            exit_codes::VALIDATION_FAILED
        }
        EngineError::Service(_) | EngineError::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        _ => exit_codes::RUNTIME_ERROR,
    }
}

/// Prints the outcome of an invocation or resumption and picks the exit code.
pub fn report(
    result: Result<Completion, EngineError>,
    poll: &PollArgs,
    output: &OutputArgs,
) -> i32 {
    match result {
        Ok(Completion::Completed(decoded)) => {
            for d in &decoded.diagnostics {
                tracing::warn!("{d}");
            }
            print_result(
                output.format,
                output.quiet,
                &decoded.value.to_output_json(output.client_flatten),
            );
            exit_codes::SUCCESS
        }
        Ok(Completion::Pending(handle)) => {
            if let Err(code) = save_handle(&handle, poll, output) {
                return code;
            }
            print_result(output.format, output.quiet, &handle);
            exit_codes::SUCCESS
        }
        Err(err) => {
            let code = exit_code_for(&err);
            let message = err.to_string();
            if let Some(handle) = err.into_handle() {
                // Still running server-side; leave a way back in.
                if save_handle(&handle, poll, output).is_ok() && poll.handle_out.is_none() {
                    print_result(output.format, output.quiet, &handle);
                }
            }
            print_error(output.format, output.quiet, &message);
            code
        }
    }
}

fn save_handle(handle: &PollHandle, poll: &PollArgs, output: &OutputArgs) -> Result<(), i32> {
    let Some(path) = &poll.handle_out else {
        return Ok(());
    };
    let text = serde_json::to_string_pretty(handle).unwrap_or_default();
    std::fs::write(path, text).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to write poll handle to {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })
}

/// Resolves on Ctrl-C; never resolves where the signal cannot be watched.
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub fn lookup_command(
    registry: Registry,
    name: &str,
    output: &OutputArgs,
) -> Result<Arc<Command>, i32> {
    let registry = install(registry).map_err(|e| {
        print_error(output.format, output.quiet, &e.to_string());
        exit_codes::RUNTIME_ERROR
    })?;
    registry.get(name).map_err(|e| {
        print_error(output.format, output.quiet, &e.to_string());
        exit_codes::VALIDATION_FAILED
    })
}

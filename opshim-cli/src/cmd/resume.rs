use std::path::Path;

use opshim_core::Registry;
use opshim_exec::{Completion, Engine, PollHandle};

use crate::cmd::config::{
    build_engine_config, build_event_sink, build_http_client, ctrl_c, load_definitions, lookup_command, report,
};
use crate::exit_codes;
use crate::output::print_error;
use crate::{EngineArgs, OutputArgs, PollArgs};

pub async fn resume_cmd(
    path: &Path,
    handle_path: &Path,
    output: OutputArgs,
    engine_args: EngineArgs,
    poll: PollArgs,
) -> i32 {
    let handle: PollHandle = match std::fs::read_to_string(handle_path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(h) => h,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to load poll handle {}: {e}", handle_path.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let parsed = match load_definitions(path, &output) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let registry = match Registry::from_document(parsed.document) {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };
    let cmd = match lookup_command(registry, &handle.command, &output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let config = match build_engine_config(&engine_args, &poll, &output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let events = match build_event_sink(&engine_args.events, &output) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let http = match build_http_client(&output) {
        Ok(h) => h,
        Err(code) => return code,
    };
    let engine = Engine::new(http, config).with_event_sink(events);

    let result = engine
        .wait_with_cancel(&cmd, handle, ctrl_c())
        .await
        .map(Completion::Completed);
    report(result, &poll, &output)
}

use std::path::Path;

use opshim_core::Registry;
use opshim_exec::{Completion, Engine, InvokeOptions, OperationResult};

use crate::cmd::config::{
    build_arguments, build_engine_config, build_event_sink, build_http_client, ctrl_c, load_definitions,
    lookup_command, report,
};
use crate::exit_codes;
use crate::output::print_error;
use crate::{CommandArgs, EngineArgs, OutputArgs, PollArgs};

pub async fn invoke_cmd(
    path: &Path,
    name: &str,
    args: CommandArgs,
    no_wait: bool,
    output: OutputArgs,
    engine_args: EngineArgs,
    poll: PollArgs,
) -> i32 {
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
    let cmd = match lookup_command(registry, name, &output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if no_wait && !cmd.no_wait_supported {
        print_error(
            output.format,
            output.quiet,
            &format!("command `{name}` does not support --no-wait"),
        );
        return exit_codes::VALIDATION_FAILED;
    }

    let arguments = match build_arguments(&args, &output) {
        Ok(a) => a,
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

    let result = if no_wait {
        engine
            .invoke(&cmd, &arguments, InvokeOptions { no_wait: true })
            .await
    } else {
        match engine.submit(&cmd, &arguments).await {
            OperationResult::Polling(handle) => engine
                .wait_with_cancel(&cmd, handle, ctrl_c())
                .await
                .map(Completion::Completed),
            other => other.into_result(),
        }
    };

    report(result, &poll, &output)
}

use std::path::Path;

use serde::Serialize;

use crate::cmd::config::load_definitions;
use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct CommandInfo {
    name: String,
    method: String,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    long_running: bool,
}

#[derive(Serialize)]
struct ListResult {
    commands: Vec<CommandInfo>,
}

pub async fn list_cmd(path: &Path, output: OutputArgs) -> i32 {
    let parsed = match load_definitions(path, &output) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let commands: Vec<CommandInfo> = parsed
        .document
        .commands
        .iter()
        .map(|c| CommandInfo {
            name: c.name.clone(),
            method: c.request.method.as_str().to_string(),
            path: c.request.path.clone(),
            description: c.description.clone(),
            long_running: c.lro.enabled,
        })
        .collect();
    let result = ListResult { commands };

    if output.format == OutputFormat::Text && !output.quiet {
        println!("Commands in {}:", path.display());
        for c in &result.commands {
            let lro = if c.long_running { " [long-running]" } else { "" };
            println!("  - {} ({} {}){lro}", c.name, c.method, c.path);
            if let Some(d) = &c.description {
                println!("    {d}");
            }
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    exit_codes::SUCCESS
}

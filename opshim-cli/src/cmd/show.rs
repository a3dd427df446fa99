use std::path::Path;

use opshim_core::types::{BodySchema, BodySource, ValueSource};
use opshim_core::Registry;

use crate::cmd::config::load_definitions;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

pub async fn show_cmd(path: &Path, name: &str, output: OutputArgs) -> i32 {
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
    let Some(def) = registry.definition(name) else {
        print_error(output.format, output.quiet, &format!("unknown command: {name}"));
        return exit_codes::VALIDATION_FAILED;
    };

    if output.format != OutputFormat::Text || output.quiet {
        print_result(output.format, output.quiet, def);
        return exit_codes::SUCCESS;
    }

    println!("{}", def.name);
    if let Some(d) = &def.description {
        println!("  {d}");
    }
    println!("  {} {}", def.request.method, def.request.path);
    let params = def
        .request
        .url_params
        .iter()
        .chain(&def.request.query_params)
        .chain(&def.request.header_params);
    for p in params {
        if let ValueSource::Arg(arg) = &p.source {
            let required = if p.required { " (required)" } else { "" };
            println!("  --arg {arg}=...{required}");
        }
    }
    if let Some(body) = &def.request.body {
        print_body_args(body);
    }
    if def.lro.enabled {
        println!(
            "  long-running: final state via {}{}",
            def.lro.final_state_via.as_str(),
            if def.no_wait_supported { ", supports --no-wait" } else { "" }
        );
    }
    exit_codes::SUCCESS
}

fn print_body_args(schema: &BodySchema) {
    for field in &schema.fields {
        match &field.source {
            BodySource::Arg(arg) => {
                let required = if field.required { " (required)" } else { "" };
                println!("  --arg {arg}=...{required}");
            }
            BodySource::Object(nested) => print_body_args(nested),
            BodySource::Literal(_) => {}
        }
    }
}

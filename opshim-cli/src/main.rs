use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "opshim", version, about = "Declarative REST command runner with long-running-operation support")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::List { path, output } => cmd::list::list_cmd(&path, output).await,
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output).await,
        Command::Show {
            path,
            command,
            output,
        } => cmd::show::show_cmd(&path, &command, output).await,
        Command::Invoke {
            path,
            command,
            args,
            no_wait,
            output,
            engine,
            poll,
        } => {
            cmd::invoke::invoke_cmd(
                &path,
                &command,
                args,
                no_wait,
                output,
                engine,
                poll,
            )
            .await
        }
        Command::Resume {
            path,
            handle,
            output,
            engine,
            poll,
        } => cmd::resume::resume_cmd(&path, &handle, output, engine, poll).await,
    }
}

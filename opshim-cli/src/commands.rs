use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the commands in a definitions file.
    List {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print one command's definition.
    Show {
        path: PathBuf,
        command: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    Invoke {
        path: PathBuf,
        command: String,
        #[command(flatten)]
        args: CommandArgs,
        /// Return after the initial response; prints a resumable poll handle.
        #[arg(long)]
        no_wait: bool,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        poll: PollArgs,
    },
    /// Continue polling an operation from a saved poll handle.
    Resume {
        path: PathBuf,
        #[arg(long)]
        handle: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        poll: PollArgs,
    },
}

use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
    /// Print output in the client shape: `flatten` fields merged into their parent.
    #[arg(long, global = true)]
    pub client_flatten: bool,
}

#[derive(Debug, Args, Clone)]
pub struct CommandArgs {
    /// Command argument; the value is read as JSON when it parses, else as a
    /// string. Dotted names nest (`tags.env=prod`).
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    pub set_args: Vec<String>,
    /// JSON or YAML object of arguments, applied before `--arg`.
    #[arg(long = "args-file")]
    pub args_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    #[arg(long, default_value = "https://management.azure.com")]
    pub base_url: String,
    /// Extra request header, e.g. an already obtained `Authorization` value.
    #[arg(long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,
    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 60_000)]
    pub timeout: u64,
    #[arg(long, default_value_t = 4_194_304)]
    pub max_response_bytes: usize,
    /// none, stdout or tracing
    #[arg(long, default_value = "tracing")]
    pub events: String,
}

#[derive(Debug, Args, Clone)]
pub struct PollArgs {
    /// Seconds between polls when the server sends no Retry-After.
    #[arg(long)]
    pub poll_interval: Option<u64>,
    #[arg(long)]
    pub max_poll_attempts: Option<u32>,
    /// Give up waiting after this many seconds; the operation keeps running.
    #[arg(long)]
    pub poll_timeout: Option<u64>,
    /// Write the poll handle here whenever the operation is left running
    /// (`--no-wait`, a poll limit, or Ctrl-C).
    #[arg(long)]
    pub handle_out: Option<PathBuf>,
}

//! CLI command definitions and dispatch.

pub mod build;
pub mod delete;
pub mod deploy;
pub mod push;
pub mod version;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fnstack_common::config::Invocation;
use fnstack_common::constants::{DEFAULT_TIMEOUT_SECS, GATEWAY_ENV, STACK_ENV};
use fnstack_engine::docker::DockerCli;
use fnstack_engine::engine::Engine;
use fnstack_engine::gateway::HttpGateway;
use fnstack_engine::pool::CancelFlag;
use fnstack_stack::loader::FileOrUrlLoader;

/// fnstack: build, push, deploy, and delete serverless functions.
#[derive(Parser, Debug)]
#[command(name = "fnstack", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build function images from a stack file or flags.
    Build(build::BuildArgs),
    /// Deploy functions to the gateway.
    Deploy(deploy::DeployArgs),
    /// Delete deployed functions.
    #[command(visible_aliases = ["rm", "remove"])]
    Delete(delete::DeleteArgs),
    /// Push function images to their registry (stack file only).
    Push(push::PushArgs),
    /// Display version information.
    Version,
}

/// Stack file selection shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct StackArgs {
    /// Stack file path or URL describing a set of functions.
    #[arg(short = 'f', long = "yaml", env = STACK_ENV)]
    pub yaml: Option<String>,
}

/// Gateway selection shared by deploy and delete.
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Gateway URL, used when the stack provider does not set one.
    #[arg(long, env = GATEWAY_ENV)]
    pub gateway: Option<String>,

    /// Timeout for each gateway request, in seconds (at least 1).
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the invocation cannot start: bad usage, an
/// unreadable stack, or a missing required field. Per-function failures
/// are reported through the returned exit code instead.
pub fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Build(args) => build::execute(args),
        Command::Deploy(args) => deploy::execute(args),
        Command::Delete(args) => delete::execute(args),
        Command::Push(args) => push::execute(args),
        Command::Version => {
            version::execute();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs an invocation against the real collaborators, prints the
/// summary, and maps the report to an exit code.
///
/// # Errors
///
/// Returns an error for anything that aborts before dispatch.
pub fn run_invocation(invocation: &Invocation) -> anyhow::Result<ExitCode> {
    let workdir = std::env::current_dir()?;
    let gateway = HttpGateway::new(invocation.timeout())?;
    let loader = FileOrUrlLoader::new().with_timeout(invocation.timeout());

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("Interrupted: no further functions will be started.");
        on_interrupt.cancel();
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))?;

    let engine = Engine::new(
        Box::new(DockerCli::new(workdir)),
        Box::new(gateway),
        Box::new(loader),
    )
    .with_cancel_flag(cancel);

    let report = engine.run(invocation)?;
    crate::output::print_summary(&report);
    Ok(ExitCode::from(report.exit_code()))
}

//! `fnstack deploy`: Deploy functions to the gateway.

use std::process::ExitCode;

use clap::Args;
use fnstack_common::config::Invocation;
use fnstack_common::constants::DEFAULT_LANGUAGE;
use fnstack_common::types::Operation;

use super::{GatewayArgs, StackArgs};

/// Arguments for the `deploy` command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Stack file selection.
    #[command(flatten)]
    pub stack: StackArgs,

    /// Gateway selection and request timeout.
    #[command(flatten)]
    pub gateway: GatewayArgs,

    /// Image to deploy.
    #[arg(long)]
    pub image: Option<String>,

    /// Name of the deployed function.
    #[arg(long)]
    pub name: Option<String>,

    /// Language template.
    #[arg(long = "lang", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Directory holding the function handler.
    #[arg(long)]
    pub handler: Option<String>,

    /// Command run by the function runtime per request.
    #[arg(long)]
    pub fprocess: Option<String>,

    /// Environment variable as KEY=VALUE. Can be repeated.
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Replace any existing function with the same name.
    #[arg(long)]
    pub replace: bool,
}

impl DeployArgs {
    fn into_invocation(self) -> Invocation {
        let mut invocation = Invocation::new(Operation::Deploy);
        invocation.stack = self.stack.yaml;
        invocation.gateway = self.gateway.gateway;
        invocation.timeout_secs = self.gateway.timeout;
        invocation.flags.name = self.name;
        invocation.flags.image = self.image;
        invocation.flags.handler = self.handler;
        invocation.flags.language = self.language;
        invocation.flags.fprocess = self.fprocess;
        invocation.flags.env = self.env;
        invocation.replace = self.replace;
        invocation
    }
}

/// Executes the `deploy` command.
///
/// # Errors
///
/// Returns an error if the stack cannot be loaded, a required flag is
/// missing, or an `--env` token is malformed.
pub fn execute(args: DeployArgs) -> anyhow::Result<ExitCode> {
    let invocation = args.into_invocation();
    tracing::info!(stack = ?invocation.stack, replace = invocation.replace, "deploying functions");
    super::run_invocation(&invocation)
}

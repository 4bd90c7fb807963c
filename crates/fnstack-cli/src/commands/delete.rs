//! `fnstack delete`: Delete deployed functions.

use std::process::ExitCode;

use clap::Args;
use fnstack_common::config::Invocation;
use fnstack_common::types::Operation;

use super::{GatewayArgs, StackArgs};

/// Arguments for the `delete` command.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Stack file selection.
    #[command(flatten)]
    pub stack: StackArgs,

    /// Gateway selection and request timeout.
    #[command(flatten)]
    pub gateway: GatewayArgs,

    /// Name of the function to delete when no stack file is given.
    #[arg(value_name = "FUNCTION_NAME", conflicts_with = "name")]
    pub function: Option<String>,

    /// Name of the function to delete.
    #[arg(long)]
    pub name: Option<String>,
}

impl DeleteArgs {
    fn into_invocation(self) -> Invocation {
        let mut invocation = Invocation::new(Operation::Delete);
        invocation.stack = self.stack.yaml;
        invocation.gateway = self.gateway.gateway;
        invocation.timeout_secs = self.gateway.timeout;
        invocation.flags.name = self.function.or(self.name);
        invocation
    }
}

/// Executes the `delete` command.
///
/// # Errors
///
/// Returns an error if the stack cannot be loaded or no function name is
/// given in flag mode.
pub fn execute(args: DeleteArgs) -> anyhow::Result<ExitCode> {
    let invocation = args.into_invocation();
    super::run_invocation(&invocation)
}

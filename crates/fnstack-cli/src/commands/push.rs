//! `fnstack push`: Push function images listed in a stack file.

use std::process::ExitCode;

use clap::Args;
use fnstack_common::config::Invocation;
use fnstack_common::constants::DEFAULT_PARALLELISM;
use fnstack_common::types::Operation;

use super::StackArgs;

/// Arguments for the `push` command.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Stack file selection.
    #[command(flatten)]
    pub stack: StackArgs,

    /// Number of images to push concurrently.
    #[arg(long, default_value_t = DEFAULT_PARALLELISM)]
    pub parallel: usize,
}

/// Executes the `push` command.
///
/// # Errors
///
/// Returns a usage error when no stack file is given.
pub fn execute(args: PushArgs) -> anyhow::Result<ExitCode> {
    super::run_invocation(&args.into_invocation())
}

impl PushArgs {
    fn into_invocation(self) -> Invocation {
        let mut invocation = Invocation::new(Operation::Push);
        invocation.stack = self.stack.yaml;
        invocation.parallelism = self.parallel;
        invocation
    }
}

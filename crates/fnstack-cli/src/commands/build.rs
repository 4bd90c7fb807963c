//! `fnstack build`: Build function images.

use std::process::ExitCode;

use clap::Args;
use fnstack_common::config::{BuildOptions, Invocation};
use fnstack_common::constants::{DEFAULT_LANGUAGE, DEFAULT_PARALLELISM};
use fnstack_common::types::Operation;

use super::StackArgs;

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Stack file selection.
    #[command(flatten)]
    pub stack: StackArgs,

    /// Image name to build.
    #[arg(long)]
    pub image: Option<String>,

    /// Directory holding the function handler.
    #[arg(long)]
    pub handler: Option<String>,

    /// Function name.
    #[arg(long)]
    pub name: Option<String>,

    /// Language template.
    #[arg(long = "lang", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Do not use the builder's layer cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Squash image layers.
    #[arg(long)]
    pub squash: bool,

    /// Number of images to build concurrently.
    #[arg(long, default_value_t = DEFAULT_PARALLELISM)]
    pub parallel: usize,
}

impl BuildArgs {
    fn into_invocation(self) -> Invocation {
        let mut invocation = Invocation::new(Operation::Build);
        invocation.stack = self.stack.yaml;
        invocation.flags.name = self.name;
        invocation.flags.image = self.image;
        invocation.flags.handler = self.handler;
        invocation.flags.language = self.language;
        invocation.build = BuildOptions {
            no_cache: self.no_cache,
            squash: self.squash,
        };
        invocation.parallelism = self.parallel;
        invocation
    }
}

/// Executes the `build` command.
///
/// # Errors
///
/// Returns an error if the stack cannot be loaded or a required flag is
/// missing.
pub fn execute(args: BuildArgs) -> anyhow::Result<ExitCode> {
    let invocation = args.into_invocation();
    tracing::info!(stack = ?invocation.stack, "building functions");
    super::run_invocation(&invocation)
}

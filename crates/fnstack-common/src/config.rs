//! Per-invocation configuration model.
//!
//! Every command folds its flags into one [`Invocation`] value that is
//! passed explicitly to the resolver and the engine. Nothing here is
//! global or shared between invocations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LANGUAGE, DEFAULT_PARALLELISM, DEFAULT_TIMEOUT_SECS};
use crate::types::Operation;

/// Function fields supplied directly on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFlags {
    /// `--name`, or the positional name for `delete`.
    pub name: Option<String>,
    /// `--image`.
    pub image: Option<String>,
    /// `--handler`.
    pub handler: Option<String>,
    /// `--lang`.
    pub language: String,
    /// `--fprocess`.
    pub fprocess: Option<String>,
    /// Raw `--env KEY=VALUE` tokens in the order they were given.
    pub env: Vec<String>,
}

impl Default for FunctionFlags {
    fn default() -> Self {
        Self {
            name: None,
            image: None,
            handler: None,
            language: DEFAULT_LANGUAGE.to_string(),
            fprocess: None,
            env: Vec::new(),
        }
    }
}

/// Invocation-wide options applied to every image build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Disable the builder's layer cache.
    pub no_cache: bool,
    /// Squash the built image layers.
    pub squash: bool,
}

/// Everything one CLI invocation asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Requested operation.
    pub operation: Operation,
    /// Stack file path or URL, if any.
    pub stack: Option<String>,
    /// Single-function flags used when no stack is given.
    pub flags: FunctionFlags,
    /// `--gateway` override.
    pub gateway: Option<String>,
    /// Build cache and squash options.
    pub build: BuildOptions,
    /// Overwrite existing functions on deploy.
    pub replace: bool,
    /// Maximum concurrent build or push operations.
    pub parallelism: usize,
    /// Timeout for each gateway request, in seconds.
    pub timeout_secs: u64,
}

impl Invocation {
    /// Creates an invocation for `operation` with every other setting at
    /// its default.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            stack: None,
            flags: FunctionFlags::default(),
            gateway: None,
            build: BuildOptions::default(),
            replace: false,
            parallelism: DEFAULT_PARALLELISM,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Returns whether a stack file drives this invocation.
    #[must_use]
    pub const fn is_stack_mode(&self) -> bool {
        self.stack.is_some()
    }

    /// Gateway request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

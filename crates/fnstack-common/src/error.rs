//! Unified error type for the fnstack workspace.
//!
//! Structural problems (usage, parse, fetch, validation, missing fields) abort
//! an invocation before any collaborator is called. Operational failures
//! (build, push, deploy, delete) are scoped to a single function and are
//! turned into per-function results by the engine.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum FnstackError {
    /// Missing argument or unsupported combination of mode and command.
    #[error("usage: {message}")]
    Usage {
        /// Description of the misuse.
        message: String,
    },

    /// A field required by the requested operation is absent.
    #[error("missing required field `{field}` for {operation} of {function}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
        /// Operation that requires it.
        operation: &'static str,
        /// Function being resolved, or `<flags>` in flag mode.
        function: String,
    },

    /// An environment variable token could not be parsed.
    #[error("invalid environment variable [{token}]: {reason}")]
    InvalidEnvVar {
        /// The offending token as supplied.
        token: String,
        /// Why the token was rejected.
        reason: &'static str,
    },

    /// The stack definition is malformed.
    #[error("failed to parse stack {location}: {message}")]
    Parse {
        /// Path or URL of the stack.
        location: String,
        /// Description of the parse failure.
        message: String,
    },

    /// The stack definition could not be retrieved.
    #[error("failed to fetch stack {location}: {message}")]
    Fetch {
        /// Path or URL of the stack.
        location: String,
        /// Description of the fetch failure.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The image builder failed for one function.
    #[error("build of {name} failed: {message}")]
    Build {
        /// Function name.
        name: String,
        /// Failure detail reported by the builder.
        message: String,
    },

    /// Pushing an image failed.
    #[error("push of {image} failed: {message}")]
    Push {
        /// Image reference.
        image: String,
        /// Failure detail reported by the builder.
        message: String,
    },

    /// The gateway rejected or failed a deploy.
    #[error("deploy of {name} failed: {message}")]
    Deploy {
        /// Function name.
        name: String,
        /// Failure detail reported by the gateway.
        message: String,
    },

    /// The gateway rejected or failed a delete.
    #[error("delete of {name} failed: {message}")]
    Delete {
        /// Function name.
        name: String,
        /// Failure detail reported by the gateway.
        message: String,
    },
}

impl FnstackError {
    /// Shorthand for a [`FnstackError::Usage`] error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FnstackError>;

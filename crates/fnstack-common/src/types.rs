//! Domain primitive types used across the fnstack workspace.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation requested for an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Build the function image.
    Build,
    /// Deploy the function to the gateway.
    Deploy,
    /// Delete the function from the gateway.
    Delete,
    /// Push the function image to its registry.
    Push,
}

impl Operation {
    /// Lowercase verb used in messages and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Deploy => "deploy",
            Self::Delete => "delete",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully merged configuration for one function, ready to hand to a
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFunctionSpec {
    /// Function name. Always the stack key in stack mode.
    pub name: String,
    /// Image reference to build, push, or deploy.
    pub image: String,
    /// Build source path.
    pub handler: String,
    /// Language template id.
    pub language: String,
    /// Per-invocation command override for the function runtime.
    pub fprocess: Option<String>,
    /// Environment passed to the deployed function.
    pub environment: BTreeMap<String, String>,
    /// Network the function joins.
    pub network: String,
    /// Gateway accepting deploy and delete requests.
    pub gateway_url: String,
    /// Whether an existing function of the same name is overwritten.
    pub replace: bool,
    /// Whether the build step is skipped for this function.
    pub skip_build: bool,
}

/// Returns `true` if `value` can be used as one directory name below a
/// fixed root: non-empty, not `.` or `..`, and free of path separators.
///
/// Function names and language ids are joined onto `build/` and
/// `template/`, so anything else could escape those directories.
pub fn is_path_segment(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".." && !value.contains(['/', '\\', '\0'])
}

/// Outcome of one function's operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The collaborator call succeeded.
    Success,
    /// The function was intentionally not processed.
    Skipped,
    /// The collaborator call failed.
    Failure,
    /// The function was never started because the run was interrupted.
    Cancelled,
}

impl Outcome {
    /// Returns whether this outcome keeps the exit status at zero.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Success | Self::Skipped)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failure => write!(f, "failure"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of attempting one operation on one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Function the operation applied to.
    pub name: String,
    /// Operation that was attempted.
    pub operation: Operation,
    /// How the attempt ended.
    pub outcome: Outcome,
    /// Error detail for failed or cancelled attempts.
    pub detail: Option<String>,
}

impl OperationResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(name: impl Into<String>, operation: Operation) -> Self {
        Self::with_outcome(name, operation, Outcome::Success, None)
    }

    /// Creates a skipped result.
    #[must_use]
    pub fn skipped(name: impl Into<String>, operation: Operation) -> Self {
        Self::with_outcome(name, operation, Outcome::Skipped, None)
    }

    /// Creates a failed result carrying the error detail.
    #[must_use]
    pub fn failure(name: impl Into<String>, operation: Operation, detail: impl Into<String>) -> Self {
        Self::with_outcome(name, operation, Outcome::Failure, Some(detail.into()))
    }

    /// Creates a result for a function that was never scheduled.
    #[must_use]
    pub fn cancelled(name: impl Into<String>, operation: Operation) -> Self {
        Self::with_outcome(
            name,
            operation,
            Outcome::Cancelled,
            Some("interrupted before start".to_string()),
        )
    }

    fn with_outcome(
        name: impl Into<String>,
        operation: Operation,
        outcome: Outcome,
        detail: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operation,
            outcome,
            detail,
        }
    }
}

/// Aggregated results for one invocation, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// One entry per attempted function.
    pub results: Vec<OperationResult>,
}

impl Report {
    /// Returns whether every result succeeded or was skipped.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_ok())
    }

    /// Counts results with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Process exit code for this report: `0` when every result is a
    /// success or skip, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.is_success())
    }
}

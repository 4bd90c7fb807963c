//! Orchestration engine that drives each function through its collaborator.

use fnstack_common::config::{BuildOptions, Invocation};
use fnstack_common::error::Result;
use fnstack_common::types::{Operation, OperationResult, Report, ResolvedFunctionSpec};
use fnstack_stack::loader::StackLoader;
use fnstack_stack::resolver;

use crate::collaborator::{GatewayClient, ImageBuilder};
use crate::pool::{self, CancelFlag};

/// The engine that turns an invocation into per-function operations.
///
/// Structural problems (usage, stack loading, resolution) abort before
/// any collaborator is called. Once dispatch starts, every function gets
/// exactly one attempt and one [`OperationResult`], regardless of how its
/// siblings fare.
pub struct Engine {
    builder: Box<dyn ImageBuilder>,
    gateway: Box<dyn GatewayClient>,
    loader: Box<dyn StackLoader>,
    cancel: CancelFlag,
}

impl Engine {
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub fn new(
        builder: Box<dyn ImageBuilder>,
        gateway: Box<dyn GatewayClient>,
        loader: Box<dyn StackLoader>,
    ) -> Self {
        Self {
            builder,
            gateway,
            loader,
            cancel: CancelFlag::new(),
        }
    }

    /// Replaces the engine's cancellation flag with a shared one.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolves and executes an invocation.
    ///
    /// # Errors
    ///
    /// Returns an error only for problems that prevent any work: a stack
    /// that cannot be fetched or parsed, a usage error, a missing required
    /// field, or a malformed environment token. Per-function failures are
    /// reported in the returned [`Report`].
    pub fn run(&self, invocation: &Invocation) -> Result<Report> {
        let specs = self.prepare(invocation)?;
        Ok(self.execute(invocation, &specs))
    }

    /// Loads the stack (if any) and resolves the function set.
    ///
    /// # Errors
    ///
    /// See [`Engine::run`].
    pub fn prepare(&self, invocation: &Invocation) -> Result<Vec<ResolvedFunctionSpec>> {
        tracing::debug!(
            invocation = %serde_json::to_string(invocation).unwrap_or_default(),
            "preparing invocation"
        );
        let stack = invocation
            .stack
            .as_deref()
            .map(|location| self.loader.load(location))
            .transpose()?;
        let specs = resolver::resolve(invocation, stack.as_ref())?;
        tracing::info!(
            operation = %invocation.operation,
            functions = specs.len(),
            "resolved function set"
        );
        Ok(specs)
    }

    /// Dispatches `invocation.operation` for every spec and aggregates
    /// the results in spec order.
    ///
    /// Build and push honour `invocation.parallelism`; deploy and delete
    /// always run one function at a time.
    #[must_use]
    pub fn execute(&self, invocation: &Invocation, specs: &[ResolvedFunctionSpec]) -> Report {
        let operation = invocation.operation;
        let workers = match operation {
            Operation::Build | Operation::Push => invocation.parallelism,
            Operation::Deploy | Operation::Delete => 1,
        };

        let results = pool::run_bounded(
            specs,
            workers,
            &self.cancel,
            |spec| self.dispatch(operation, spec, invocation.build),
            |spec| {
                tracing::warn!(name = %spec.name, "not started: interrupted");
                OperationResult::cancelled(&spec.name, operation)
            },
        );

        let report = Report { results };
        tracing::info!(
            operation = %operation,
            total = report.results.len(),
            ok = report.is_success(),
            "operation finished"
        );
        report
    }

    fn dispatch(
        &self,
        operation: Operation,
        spec: &ResolvedFunctionSpec,
        options: BuildOptions,
    ) -> OperationResult {
        let span = tracing::info_span!("function", name = %spec.name, %operation);
        let _guard = span.enter();

        let attempt = match operation {
            Operation::Build if spec.skip_build => {
                eprintln!("Skipping build of: {}.", spec.name);
                return OperationResult::skipped(&spec.name, operation);
            }
            Operation::Build => {
                eprintln!("Building: {}.", spec.name);
                self.builder.build(spec, options)
            }
            Operation::Deploy => {
                eprintln!("Deploying: {}.", spec.name);
                self.gateway.deploy(spec)
            }
            Operation::Delete => {
                eprintln!("Deleting: {}.", spec.name);
                self.gateway.delete(&spec.gateway_url, &spec.name)
            }
            Operation::Push => {
                eprintln!("Pushing: {} to remote repository.", spec.name);
                self.builder.push(&spec.image)
            }
        };

        match attempt {
            Ok(()) => {
                tracing::info!("succeeded");
                OperationResult::success(&spec.name, operation)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed");
                OperationResult::failure(&spec.name, operation, e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

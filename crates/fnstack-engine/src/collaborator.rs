//! Capability traits for the external systems the engine drives.
//!
//! Implementors handle transport and protocol details. The engine only
//! decides which call to make for which function and records the result.

use fnstack_common::config::BuildOptions;
use fnstack_common::error::Result;
use fnstack_common::types::ResolvedFunctionSpec;

/// Builds and pushes container images.
pub trait ImageBuilder: Send + Sync {
    /// Builds the image for `spec` with invocation-wide `options`.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Build`](fnstack_common::error::FnstackError::Build)
    /// if the build cannot be staged or the builder reports failure.
    fn build(&self, spec: &ResolvedFunctionSpec, options: BuildOptions) -> Result<()>;

    /// Pushes `image` to its registry.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Push`](fnstack_common::error::FnstackError::Push)
    /// if the push fails.
    fn push(&self, image: &str) -> Result<()>;
}

/// Deploys and deletes functions on a remote gateway.
pub trait GatewayClient: Send + Sync {
    /// Deploys `spec` to `spec.gateway_url`, honouring `spec.replace`.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Deploy`](fnstack_common::error::FnstackError::Deploy)
    /// if the gateway is unreachable or rejects the function.
    fn deploy(&self, spec: &ResolvedFunctionSpec) -> Result<()>;

    /// Deletes the function `name` from the gateway at `gateway_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Delete`](fnstack_common::error::FnstackError::Delete)
    /// if the gateway is unreachable, has no such function, or refuses.
    fn delete(&self, gateway_url: &str, name: &str) -> Result<()>;
}

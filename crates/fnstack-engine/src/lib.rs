//! Multi-function orchestration for the fnstack CLI.
//!
//! Handles:
//! - **Engine**: Stack loading, resolution, and per-function dispatch.
//! - **Collaborator**: Traits for the image builder and gateway client.
//! - **Pool**: Bounded worker pool with cooperative cancellation.
//! - **Docker**: `docker` CLI-backed image builder.
//! - **Gateway**: HTTP gateway client.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod collaborator;
pub mod docker;
pub mod engine;
pub mod gateway;
pub mod pool;

//! # fnstack-stack
//!
//! Stack definitions and their resolution into per-function specs.
//!
//! Handles:
//! - **Definition**: The YAML stack schema (provider plus functions).
//! - **Loader**: Retrieval of stacks from local paths and URLs.
//! - **Env**: Validated parsing of `KEY=VALUE` tokens.
//! - **Resolver**: Default propagation and required-field checks.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod definition;
pub mod env;
pub mod loader;
pub mod resolver;

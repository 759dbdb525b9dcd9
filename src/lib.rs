//! zerogen - scaffolding and build orchestration for plugin workspaces
//!
//! A plugin workspace holds component and module packages under
//! `packages/`. This crate discovers them, type checks the workspace once,
//! bundles every package concurrently, and keeps the shared public-API
//! index consistent while packages are generated.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for zerogen unit tests.
///
/// Workspace fixtures plus stand-ins for the type check, the bundler and
/// index storage. Only compiled for tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildTarget, Bundler, Compiler};
pub use core::{Kind, Package, Registry, Workspace};
pub use ops::{BuildOutcome, BuildReport};
pub use util::context::GlobalContext;

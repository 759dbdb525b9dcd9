//! High-level operations.
//!
//! This module contains the implementation of zerogen commands.

pub mod templates;
pub mod zerogen_build;
pub mod zerogen_generate;
pub mod zerogen_new;
pub mod zerogen_serve;

pub use zerogen_build::{build, BuildEntry, BuildError, BuildOptions, BuildOutcome, BuildReport};
pub use zerogen_generate::{
    generate_package, generate_package_with_registry, GenerateOptions, GenerateResult,
};
pub use zerogen_new::{new_workspace, NewOptions};
pub use zerogen_serve::{start_dev_server, start_plugin_server, PluginServerSettings};

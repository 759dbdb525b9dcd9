//! Core data structures for zerogen.
//!
//! This module contains the foundational types used throughout zerogen:
//! - Manifests (`package.json`, `plugin.json`) and package kinds
//! - Packages and workspace discovery
//! - The public-API registry

pub mod manifest;
pub mod package;
pub mod registry;
pub mod workspace;

pub use manifest::{Kind, ManifestError, PackageManifest, PluginDescriptor};
pub use package::Package;
pub use registry::{Registry, RegistryError};
pub use workspace::{filter_by_name, list_packages, Workspace, WorkspaceError};

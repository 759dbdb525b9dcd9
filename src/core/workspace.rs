//! Workspace - the scaffolded plugin project and package discovery.
//!
//! A directory is a workspace when it contains `plugin.json`. Packages live
//! in direct subdirectories of `packages/`; generated packages are exported
//! from `public-api.ts`.

use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::manifest::{ManifestError, PackageManifest, PluginDescriptor};
use crate::core::package::{Package, PACKAGE_MANIFEST};
use crate::core::registry::Registry;

/// Workspace descriptor; its presence marks a workspace root.
pub const DESCRIPTOR_NAME: &str = "plugin.json";

/// Directory holding the workspace's packages.
pub const PACKAGES_DIR: &str = "packages";

/// The shared public-API index.
pub const INDEX_NAME: &str = "public-api.ts";

/// TypeScript project file used for the type check.
pub const TSCONFIG_NAME: &str = "tsconfig.json";

/// Configuration errors: the workspace itself is malformed.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum WorkspaceError {
    #[error("could not find `plugin.json` in `{}` or any parent directory", dir.display())]
    #[diagnostic(
        code(zerogen::workspace::not_found),
        help("Run `zerogen new <name>` to create a plugin workspace")
    )]
    NotAWorkspace { dir: PathBuf },

    #[error("package root `{}` does not exist", path.display())]
    #[diagnostic(
        code(zerogen::workspace::missing_package_root),
        help("Create the `packages/` directory or regenerate the workspace")
    )]
    MissingPackageRoot { path: PathBuf },

    #[error("failed to read package root `{}`", path.display())]
    #[diagnostic(code(zerogen::workspace::io))]
    ReadPackageRoot {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid workspace descriptor")]
    #[diagnostic(code(zerogen::workspace::descriptor))]
    Descriptor(#[from] ManifestError),
}

/// A plugin workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Workspace root directory
    root: PathBuf,

    /// Parsed `plugin.json`
    descriptor: PluginDescriptor,
}

impl Workspace {
    /// Open the workspace rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, WorkspaceError> {
        let descriptor_path = root.join(DESCRIPTOR_NAME);
        let descriptor = match PluginDescriptor::load(&descriptor_path) {
            Ok(descriptor) => descriptor,
            Err(ManifestError::NotFound { .. }) => {
                return Err(WorkspaceError::NotAWorkspace {
                    dir: root.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        Ok(Workspace { root, descriptor })
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the plugin descriptor.
    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    /// Directory holding the packages.
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join(PACKAGES_DIR)
    }

    /// Directory a package named `name` lives (or would live) in.
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.packages_dir().join(name)
    }

    /// Path of the public-API index.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_NAME)
    }

    /// Path of the TypeScript project file.
    pub fn tsconfig_path(&self) -> PathBuf {
        self.root.join(TSCONFIG_NAME)
    }

    /// The public-API registry of this workspace.
    pub fn registry(&self) -> Registry {
        Registry::new(self.index_path())
    }

    /// Discover all packages, in discovery order.
    pub fn packages(&self) -> Result<Vec<Package>, WorkspaceError> {
        Ok(list_packages(&self.packages_dir())?
            .iter()
            .map(|dir| Package::load(dir))
            .collect())
    }
}

/// List the direct subdirectories of `packages_root`, sorted by name.
///
/// Directories without a manifest are included. A missing root is a
/// configuration error, never an empty workspace.
pub fn list_packages(packages_root: &Path) -> Result<Vec<PathBuf>, WorkspaceError> {
    if !packages_root.is_dir() {
        return Err(WorkspaceError::MissingPackageRoot {
            path: packages_root.to_path_buf(),
        });
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(packages_root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| WorkspaceError::ReadPackageRoot {
            path: packages_root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}

/// Keep the package directories whose manifest declares `name`.
///
/// Directories with a missing or unreadable manifest never match.
pub fn filter_by_name(paths: &[PathBuf], name: &str) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|dir| {
            PackageManifest::load(&dir.join(PACKAGE_MANIFEST))
                .ok()
                .and_then(|m| m.name)
                .is_some_and(|declared| declared == name)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::WorkspaceFixture;

    #[test]
    fn test_load_requires_descriptor() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = Workspace::load(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::NotAWorkspace { .. }));
    }

    #[test]
    fn test_load_rejects_broken_descriptor() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join(DESCRIPTOR_NAME), "{").unwrap();
        let err = Workspace::load(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::Descriptor(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_paths() {
        let fixture = WorkspaceFixture::new("demo");
        let ws = fixture.workspace();
        assert!(ws.packages_dir().ends_with("packages"));
        assert!(ws.index_path().ends_with("public-api.ts"));
        assert!(ws.package_dir("alpha").ends_with("packages/alpha"));
        assert_eq!(ws.descriptor().name, "demo");
    }

    #[test]
    fn test_list_packages_direct_children_sorted() {
        let fixture = WorkspaceFixture::new("demo");
        fixture.component("zeta");
        fixture.module("alpha");
        fixture.bare_dir("no-manifest");
        fixture.bare_dir("alpha/nested");
        std::fs::write(fixture.packages_dir().join("README.md"), "x").unwrap();

        let dirs = list_packages(&fixture.packages_dir()).unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["alpha", "no-manifest", "zeta"]);
    }

    #[test]
    fn test_list_packages_missing_root_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = list_packages(&tmp.path().join("packages")).unwrap_err();
        assert!(matches!(err, WorkspaceError::MissingPackageRoot { .. }));
    }

    #[test]
    fn test_list_packages_empty_root() {
        let fixture = WorkspaceFixture::new("demo");
        assert!(list_packages(&fixture.packages_dir()).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_name() {
        let fixture = WorkspaceFixture::new("demo");
        fixture.component("alpha");
        fixture.module("beta");
        fixture.bare_dir("gamma");

        let dirs = list_packages(&fixture.packages_dir()).unwrap();
        let matched = filter_by_name(&dirs, "beta");
        assert_eq!(matched, vec![fixture.packages_dir().join("beta")]);

        assert!(filter_by_name(&dirs, "gamma").is_empty());
        assert!(filter_by_name(&dirs, "missing").is_empty());
    }
}

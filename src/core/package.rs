//! Package - one directory under the workspace's package root.

use std::path::{Path, PathBuf};

use crate::core::manifest::{Kind, PackageManifest};

/// File name of a package manifest.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// A package directory together with its (possibly absent) manifest.
#[derive(Debug, Clone)]
pub struct Package {
    /// Directory name, unique within the workspace
    name: String,

    /// Root directory of the package
    root: PathBuf,

    /// Parsed manifest; `None` if missing or unparseable
    manifest: Option<PackageManifest>,
}

impl Package {
    /// Load a package from its directory.
    ///
    /// A missing or broken manifest is not an error here: such a package
    /// still exists, it just cannot be built.
    pub fn load(root: &Path) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let manifest = match PackageManifest::load(&root.join(PACKAGE_MANIFEST)) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                tracing::debug!("package `{}` has no usable manifest: {}", name, e);
                None
            }
        };

        Package {
            name,
            root: root.to_path_buf(),
            manifest,
        }
    }

    /// Get the package (directory) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the package root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the manifest, if it could be read.
    pub fn manifest(&self) -> Option<&PackageManifest> {
        self.manifest.as_ref()
    }

    /// Derived kind of the package.
    pub fn kind(&self) -> Kind {
        self.manifest
            .as_ref()
            .map(PackageManifest::kind)
            .unwrap_or(Kind::Unknown)
    }
}

//! Entry resolution: from a package manifest to a build target.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::core::manifest::{Kind, PackageManifest};
use crate::core::package::Package;
use crate::util::naming::kebab_case;

/// Reason recorded for packages that declare no kind.
pub const NO_ENTRY_REASON: &str = "no buildable entry declared";

/// Entry file of module packages.
pub const MODULE_ENTRY: &str = "index.js";

/// `MODULE_ENTRY` without its extension, as it appears in export paths.
pub const MODULE_STEM: &str = "index";

/// Everything needed to bundle one package. Lives for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Package (directory) name
    pub package: String,

    /// Component or Module
    pub kind: Kind,

    /// Entry file to bundle
    pub entry: PathBuf,

    /// Output directory owned exclusively by this target
    pub out_dir: PathBuf,

    /// File name of the single bundled artifact
    pub artifact_name: String,
}

impl BuildTarget {
    /// Full path of the bundled artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.out_dir.join(&self.artifact_name)
    }
}

/// Outcome of resolving one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Target(BuildTarget),
    Unbuildable(String),
}

/// Name of a kind's entry file for the package directory `dir_name`.
///
/// Component files are named with the same transform the generator uses,
/// so a generated component is always found again.
pub fn entry_file_name(kind: Kind, dir_name: &str) -> Option<String> {
    match kind {
        Kind::Component => Some(format!("{}.ts", kebab_case(dir_name))),
        Kind::Module => Some(MODULE_ENTRY.to_string()),
        Kind::Unknown => None,
    }
}

/// Artifact file name: the declared package name without an npm scope.
fn artifact_name(manifest: &PackageManifest, dir_name: &str) -> String {
    let declared = manifest.name.as_deref().unwrap_or(dir_name);
    let base = declared.rsplit('/').next().unwrap_or(declared);
    let base = if base.is_empty() { dir_name } else { base };
    format!("{}.js", base)
}

/// Output directory name that does not name a directory inside the package.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid output directory `{0}`: expected a single directory name inside the package")]
pub struct InvalidOutDir(pub String);

/// Check that `name` is exactly one plain path segment.
///
/// The output directory is wiped before every bundle, so `.`, `..`, nested
/// or absolute paths would take package sources with it.
pub fn check_out_dir(name: &str) -> Result<(), InvalidOutDir> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(InvalidOutDir(name.to_string())),
    }
}

/// Resolves packages to build targets.
#[derive(Debug, Clone)]
pub struct EntryResolver {
    out_dir_name: String,
}

impl Default for EntryResolver {
    fn default() -> Self {
        EntryResolver {
            out_dir_name: "dist".to_string(),
        }
    }
}

impl EntryResolver {
    /// Resolver writing outputs to `<package>/<out_dir_name>`.
    pub fn new(out_dir_name: impl Into<String>) -> Result<Self, InvalidOutDir> {
        let out_dir_name = out_dir_name.into();
        check_out_dir(&out_dir_name)?;
        Ok(EntryResolver { out_dir_name })
    }

    /// Resolve a package directory given its manifest, if one was readable.
    pub fn resolve(&self, manifest: Option<&PackageManifest>, package_dir: &Path) -> Resolution {
        let Some(manifest) = manifest else {
            return Resolution::Unbuildable(NO_ENTRY_REASON.to_string());
        };

        let dir_name = package_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let kind = manifest.kind();
        match entry_file_name(kind, &dir_name) {
            Some(file) => Resolution::Target(BuildTarget {
                package: dir_name.clone(),
                kind,
                entry: package_dir.join(file),
                out_dir: package_dir.join(&self.out_dir_name),
                artifact_name: artifact_name(manifest, &dir_name),
            }),
            None => Resolution::Unbuildable(NO_ENTRY_REASON.to_string()),
        }
    }

    /// Resolve a loaded package.
    pub fn resolve_package(&self, package: &Package) -> Resolution {
        self.resolve(package.manifest(), package.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(value: serde_json::Value) -> PackageManifest {
        serde_json::from_value(value).unwrap()
    }

    fn target(resolution: Resolution) -> BuildTarget {
        match resolution {
            Resolution::Target(t) => t,
            Resolution::Unbuildable(reason) => panic!("unexpectedly unbuildable: {}", reason),
        }
    }

    #[test]
    fn test_component_entry_is_kebab_ts() {
        let m = manifest(json!({"name": "myWidget", "zero": {"component": true}}));
        let t = target(EntryResolver::default().resolve(Some(&m), Path::new("/ws/packages/myWidget")));

        assert_eq!(t.kind, Kind::Component);
        assert_eq!(t.entry, PathBuf::from("/ws/packages/myWidget/my-widget.ts"));
        assert_eq!(t.out_dir, PathBuf::from("/ws/packages/myWidget/dist"));
        assert_eq!(t.artifact_path(), PathBuf::from("/ws/packages/myWidget/dist/myWidget.js"));
    }

    #[test]
    fn test_module_entry_is_index_js() {
        let m = manifest(json!({"name": "beta", "zero": {"module": true}}));
        let t = target(EntryResolver::new("out").unwrap().resolve(Some(&m), Path::new("/ws/packages/beta")));

        assert_eq!(t.kind, Kind::Module);
        assert!(t.entry.ends_with("index.js"));
        assert_eq!(t.out_dir, PathBuf::from("/ws/packages/beta/out"));
    }

    #[test]
    fn test_unknown_kinds_are_unbuildable() {
        let resolver = EntryResolver::default();
        let dir = Path::new("/ws/packages/gamma");

        for m in [
            manifest(json!({"name": "gamma"})),
            manifest(json!({"name": "gamma", "zero": {"component": true, "module": true}})),
        ] {
            assert_eq!(
                resolver.resolve(Some(&m), dir),
                Resolution::Unbuildable(NO_ENTRY_REASON.to_string())
            );
        }
        assert_eq!(
            resolver.resolve(None, dir),
            Resolution::Unbuildable(NO_ENTRY_REASON.to_string())
        );
    }

    #[test]
    fn test_artifact_name_strips_scope() {
        let m = manifest(json!({"name": "@acme/alpha", "zero": {"component": true}}));
        let t = target(EntryResolver::default().resolve(Some(&m), Path::new("/ws/packages/alpha")));
        assert_eq!(t.artifact_name, "alpha.js");

        let unnamed = manifest(json!({"zero": {"module": true}}));
        let t = target(EntryResolver::default().resolve(Some(&unnamed), Path::new("/ws/packages/beta")));
        assert_eq!(t.artifact_name, "beta.js");
    }

    #[test]
    fn test_entry_file_name_matches_generator_transform() {
        for name in ["date picker", "datePicker", "date-picker", "DatePicker"] {
            assert_eq!(
                entry_file_name(Kind::Component, name).as_deref(),
                Some("date-picker.ts")
            );
        }
        assert_eq!(entry_file_name(Kind::Unknown, "x"), None);
    }

    #[test]
    fn test_out_dir_must_be_one_plain_segment() {
        for ok in ["dist", "build-out", ".cache", "dist/"] {
            assert!(EntryResolver::new(ok).is_ok(), "{} rejected", ok);
        }
        for bad in ["", ".", "..", "../dist", "./dist", "dist/js", "/tmp/dist"] {
            assert_eq!(
                EntryResolver::new(bad).unwrap_err(),
                InvalidOutDir(bad.to_string())
            );
        }
    }
}

//! JSON manifests: the per-package `package.json` and the workspace-level
//! `plugin.json` descriptor.
//!
//! This is the only module that reads or writes persisted package metadata.
//! Fields zerogen does not understand are carried through a flattened map so
//! that a load/save cycle never drops what npm or the user put there.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors reading or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Declared kind of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A custom element, entry `<kebab-name>.ts`
    Component,
    /// A plain module, entry `index.js`
    Module,
    /// Neither or both flags declared
    Unknown,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Component => write!(f, "component"),
            Kind::Module => write!(f, "module"),
            Kind::Unknown => write!(f, "unknown"),
        }
    }
}

/// The `"zero"` block of a package manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KindBlock {
    /// A block declaring exactly one of the two kinds.
    pub fn new(kind: Kind, description: impl Into<String>) -> Self {
        let mut block = KindBlock {
            description: Some(description.into()),
            ..Default::default()
        };
        match kind {
            Kind::Component => block.component = Some(Value::Bool(true)),
            Kind::Module => block.module = Some(Value::Bool(true)),
            Kind::Unknown => {}
        }
        block
    }

    /// Classify the block. Exactly one flag must be set.
    pub fn kind(&self) -> Kind {
        match (is_set(self.component.as_ref()), is_set(self.module.as_ref())) {
            (true, false) => Kind::Component,
            (false, true) => Kind::Module,
            _ => Kind::Unknown,
        }
    }
}

/// `true` and `"true"` both count as a set flag.
fn is_set(flag: Option<&Value>) -> bool {
    match flag {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// A package's `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        rename = "zero",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind_block: Option<KindBlock>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageManifest {
    /// Load a package manifest.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        load_json(path)
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        save_json(path, self)
    }

    /// The declared kind; a missing block is `Unknown`.
    pub fn kind(&self) -> Kind {
        self.kind_block
            .as_ref()
            .map(KindBlock::kind)
            .unwrap_or(Kind::Unknown)
    }

    /// The declared description, if any.
    pub fn description(&self) -> Option<&str> {
        self.kind_block.as_ref()?.description.as_deref()
    }

    /// Set an extra top-level field (`version`, `main`, ...).
    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        self.extra.insert(key.to_string(), value.into());
    }
}

/// Selector settings for generated components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSettings {
    #[serde(rename = "selectorPrefix", default = "default_selector_prefix")]
    pub selector_prefix: String,
}

impl Default for ComponentSettings {
    fn default() -> Self {
        ComponentSettings {
            selector_prefix: default_selector_prefix(),
        }
    }
}

fn default_selector_prefix() -> String {
    "zero".to_string()
}

/// Id settings for generated modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSettings {
    #[serde(rename = "idPrefix", default = "default_id_prefix")]
    pub id_prefix: String,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        ModuleSettings {
            id_prefix: default_id_prefix(),
        }
    }
}

fn default_id_prefix() -> String {
    "mod".to_string()
}

/// The workspace-level `plugin.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,

    #[serde(default)]
    pub components: ComponentSettings,

    #[serde(default)]
    pub modules: ModuleSettings,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginDescriptor {
    /// A descriptor with default prefixes.
    pub fn new(name: impl Into<String>) -> Self {
        PluginDescriptor {
            name: name.into(),
            components: ComponentSettings::default(),
            modules: ModuleSettings::default(),
            extra: Map::new(),
        }
    }

    /// Load a plugin descriptor.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        load_json(path)
    }

    /// Write the descriptor as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        save_json(path, self)
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ManifestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ManifestError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    serde_json::from_str(&contents).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ManifestError> {
    let io_err = |source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut contents = serde_json::to_string_pretty(value).map_err(|e| io_err(e.into()))?;
    contents.push('\n');
    std::fs::write(path, contents).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn manifest(value: Value) -> PackageManifest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_kind_from_flags() {
        assert_eq!(
            manifest(json!({"name": "a", "zero": {"component": true}})).kind(),
            Kind::Component
        );
        assert_eq!(
            manifest(json!({"name": "b", "zero": {"module": "true"}})).kind(),
            Kind::Module
        );
    }

    #[test]
    fn test_kind_neither_or_both_is_unknown() {
        assert_eq!(manifest(json!({"name": "c"})).kind(), Kind::Unknown);
        assert_eq!(
            manifest(json!({"name": "c", "zero": {"description": "x"}})).kind(),
            Kind::Unknown
        );
        assert_eq!(
            manifest(json!({"zero": {"component": true, "module": true}})).kind(),
            Kind::Unknown
        );
        assert_eq!(
            manifest(json!({"zero": {"component": false, "module": 1}})).kind(),
            Kind::Unknown
        );
    }

    #[test]
    fn test_roundtrip_keeps_unknown_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.json");
        std::fs::write(
            &path,
            r#"{"name":"alpha","version":"1.0.0","scripts":{"test":"x"},"zero":{"component":true,"description":"d","extra":1}}"#,
        )
        .unwrap();

        let loaded = PackageManifest::load(&path).unwrap();
        assert_eq!(loaded.description(), Some("d"));
        loaded.save(&path).unwrap();

        let reloaded: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded["version"], "1.0.0");
        assert_eq!(reloaded["scripts"]["test"], "x");
        assert_eq!(reloaded["zero"]["extra"], 1);
    }

    #[test]
    fn test_load_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("package.json");
        assert!(matches!(
            PackageManifest::load(&missing),
            Err(ManifestError::NotFound { .. })
        ));

        std::fs::write(&missing, "{ not json").unwrap();
        assert!(matches!(
            PackageManifest::load(&missing),
            Err(ManifestError::Parse { .. })
        ));
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor: PluginDescriptor = serde_json::from_str(r#"{"name":"demo"}"#).unwrap();
        assert_eq!(descriptor.components.selector_prefix, "zero");
        assert_eq!(descriptor.modules.id_prefix, "mod");

        let value = serde_json::to_value(PluginDescriptor::new("demo")).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "demo",
                "components": {"selectorPrefix": "zero"},
                "modules": {"idPrefix": "mod"}
            })
        );
    }

    #[test]
    fn test_kind_block_new() {
        assert_eq!(KindBlock::new(Kind::Component, "c").kind(), Kind::Component);
        assert_eq!(KindBlock::new(Kind::Module, "m").kind(), Kind::Module);
    }
}

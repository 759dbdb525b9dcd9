//! Configuration file support for zerogen.
//!
//! zerogen reads two configuration file locations:
//! - Global: `~/.zerogen/config.toml` - User-wide defaults
//! - Project: `<workspace>/.zerogen/config.toml` - Workspace-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// zerogen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Dev server and plugin server settings
    pub serve: ServeConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Number of concurrent bundling tasks (None = one per CPU)
    pub jobs: Option<usize>,

    /// Program used to run tsc and esbuild (defaults to `npx` from PATH)
    pub npx: Option<String>,

    /// Minify bundles
    pub minify: bool,

    /// Per-package output directory name
    pub out_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            jobs: None,
            npx: None,
            minify: true,
            out_dir: "dist".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Dev server port for `zerogen start`
    pub port: u16,

    /// Plugin server port for `zerogen serve`
    pub plugin_port: u16,

    /// Base path the plugin server mounts its routes on
    pub base_path: String,

    /// Directory (relative to `server/`) holding published plugin bundles
    pub plugin_dir_root: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            port: 9898,
            plugin_port: 5555,
            base_path: "/service".to_string(),
            plugin_dir_root: "plugins".to_string(),
        }
    }
}

/// Partial config as it appears on disk; unset keys do not override.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    build: RawBuildConfig,
    serve: RawServeConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBuildConfig {
    jobs: Option<usize>,
    npx: Option<String>,
    minify: Option<bool>,
    out_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawServeConfig {
    port: Option<u16>,
    plugin_port: Option<u16>,
    base_path: Option<String>,
    plugin_dir_root: Option<String>,
}

impl Config {
    /// Load configuration from a single file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.merge(load_raw(path)?);
        Ok(config)
    }

    fn merge(&mut self, raw: RawConfig) {
        if raw.build.jobs.is_some() {
            self.build.jobs = raw.build.jobs;
        }
        if raw.build.npx.is_some() {
            self.build.npx = raw.build.npx;
        }
        if let Some(minify) = raw.build.minify {
            self.build.minify = minify;
        }
        if let Some(out_dir) = raw.build.out_dir {
            self.build.out_dir = out_dir;
        }
        if let Some(port) = raw.serve.port {
            self.serve.port = port;
        }
        if let Some(port) = raw.serve.plugin_port {
            self.serve.plugin_port = port;
        }
        if let Some(base_path) = raw.serve.base_path {
            self.serve.base_path = base_path;
        }
        if let Some(root) = raw.serve.plugin_dir_root {
            self.serve.plugin_dir_root = root;
        }
    }
}

fn load_raw(path: &Path) -> Result<RawConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;

    toml::from_str(&contents).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.zerogen/config.toml)
/// 2. Global config (~/.zerogen/config.toml)
/// 3. Defaults
///
/// A config file that fails to parse is reported and ignored.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    for path in global_path.into_iter().chain(std::iter::once(project_path)) {
        if !path.exists() {
            continue;
        }
        match load_raw(path) {
            Ok(raw) => config.merge(raw),
            Err(e) => tracing::warn!("ignoring config {}: {:#}", path.display(), e),
        }
    }

    config
}

/// Get the global zerogen config directory (~/.zerogen).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".zerogen"))
}

/// Get the global config path (~/.zerogen/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.zerogen/config.toml).
pub fn project_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".zerogen").join("config.toml")
}

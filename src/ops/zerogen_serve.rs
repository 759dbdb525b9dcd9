//! Implementation of `zerogen start` and `zerogen serve`.
//!
//! Both commands hand the terminal to a long-running node process and wait
//! for it to exit.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::workspace::Workspace;
use crate::ops::zerogen_new::SERVER_DIR;
use crate::util::config::ServeConfig;
use crate::util::fs::ensure_dir;
use crate::util::process::{resolve_node, resolve_npx, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// Entry script of the plugin server.
const SERVER_ENTRY: &str = "index.js";

/// Settings for the plugin server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginServerSettings {
    pub port: u16,
    pub base_path: String,
    pub plugin_dir_root: String,
}

impl From<&ServeConfig> for PluginServerSettings {
    fn from(config: &ServeConfig) -> Self {
        PluginServerSettings {
            port: config.plugin_port,
            base_path: config.base_path.clone(),
            plugin_dir_root: config.plugin_dir_root.clone(),
        }
    }
}

impl Default for PluginServerSettings {
    fn default() -> Self {
        PluginServerSettings::from(&ServeConfig::default())
    }
}

fn dev_server_command(npx: &Path, ws: &Workspace, port: u16) -> ProcessBuilder {
    ProcessBuilder::new(npx)
        .args(["--yes", "vite", "--port"])
        .arg(port.to_string())
        .cwd(ws.root())
}

fn plugin_server_command(
    node: &Path,
    server_dir: &Path,
    settings: &PluginServerSettings,
) -> ProcessBuilder {
    ProcessBuilder::new(node)
        .args(["--watch", SERVER_ENTRY])
        .env("PORT", settings.port.to_string())
        .env("BASE_PATH", &settings.base_path)
        .env("PLUGIN_DIR_ROOT", &settings.plugin_dir_root)
        .cwd(server_dir)
}

/// Serve the workspace with vite until the server exits.
pub fn start_dev_server(ws: &Workspace, port: u16, npx: Option<&str>, shell: &Shell) -> Result<()> {
    let cmd = dev_server_command(&resolve_npx(npx), ws, port);
    shell.status(
        Status::Serving,
        format!("{} on http://localhost:{}", ws.descriptor().name, port),
    );

    let status = cmd.status()?;
    if !status.success() {
        bail!("dev server exited with code {:?}", status.code());
    }
    Ok(())
}

/// Run the plugin server from `<root>/server` until it exits.
///
/// A workspace without a server directory only gets a warning.
pub fn start_plugin_server(
    ws: &Workspace,
    settings: &PluginServerSettings,
    shell: &Shell,
) -> Result<()> {
    let server_dir = ws.root().join(SERVER_DIR);
    if !server_dir.is_dir() {
        shell.warn(format!("plugin server not found in {}", server_dir.display()));
        return Ok(());
    }

    ensure_dir(&plugin_dir(ws, settings))?;
    let cmd = plugin_server_command(&resolve_node(), &server_dir, settings);
    shell.status(
        Status::Serving,
        format!("plugins on http://localhost:{}{}", settings.port, settings.base_path),
    );

    let status = cmd.status()?;
    if !status.success() {
        bail!("plugin server exited with code {:?}", status.code());
    }
    Ok(())
}

/// Where published bundles are served from.
pub fn plugin_dir(ws: &Workspace, settings: &PluginServerSettings) -> PathBuf {
    ws.root().join(SERVER_DIR).join(&settings.plugin_dir_root)
}

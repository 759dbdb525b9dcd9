//! Global context for zerogen operations.
//!
//! Provides centralized access to the working directory, configuration
//! paths and workspace discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::{WorkspaceError, DESCRIPTOR_NAME};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context for zerogen operations.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a new global context from the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext::with_cwd(cwd))
    }

    /// Create a context with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext { cwd }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find the workspace root by searching upward for `plugin.json`.
    pub fn find_workspace_root(&self) -> Result<PathBuf, WorkspaceError> {
        let mut current = self.cwd.clone();
        loop {
            if current.join(DESCRIPTOR_NAME).is_file() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(WorkspaceError::NotAWorkspace {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Load the merged global and project configuration for a workspace.
    pub fn config(&self, workspace_root: &Path) -> Config {
        let global = global_config_path();
        load_config(global.as_deref(), &project_config_path(workspace_root))
    }
}

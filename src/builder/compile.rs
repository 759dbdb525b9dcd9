//! Workspace-wide type check, run once before any bundling.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::workspace::TSCONFIG_NAME;
use crate::util::process::{combined_output, ProcessBuilder};

/// The type check failed; nothing may be bundled.
#[derive(Debug, Error)]
#[error("type check failed")]
pub struct TypecheckError {
    /// Compiler output
    pub diagnostics: String,
}

/// Capability to type-check a workspace.
pub trait Compiler: Send + Sync {
    fn typecheck(&self, workspace_root: &Path) -> Result<(), TypecheckError>;
}

/// Runs `tsc -p ./tsconfig.json` through npx.
#[derive(Debug, Clone)]
pub struct TscCompiler {
    npx: PathBuf,
}

impl TscCompiler {
    pub fn new(npx: PathBuf) -> Self {
        TscCompiler { npx }
    }
}

impl Compiler for TscCompiler {
    fn typecheck(&self, workspace_root: &Path) -> Result<(), TypecheckError> {
        let cmd = ProcessBuilder::new(&self.npx)
            .args(["tsc", "-p"])
            .arg(format!("./{}", TSCONFIG_NAME))
            .cwd(workspace_root);

        let output = cmd.exec().map_err(|e| TypecheckError {
            diagnostics: format!("{:#}", e),
        })?;

        if output.status.success() {
            return Ok(());
        }

        let mut diagnostics = combined_output(&output);
        if diagnostics.is_empty() {
            diagnostics = format!(
                "`{}` exited with code {:?}",
                cmd.display_command(),
                output.status.code()
            );
        }
        Err(TypecheckError { diagnostics })
    }
}

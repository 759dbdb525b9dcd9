//! Per-package bundling.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::builder::entry::BuildTarget;
use crate::util::process::{combined_output, ProcessBuilder};

/// Capability to bundle one target into `target.artifact_path()`.
///
/// Called concurrently for different targets; an implementation must only
/// touch the target's own output directory.
pub trait Bundler: Send + Sync {
    fn bundle(&self, target: &BuildTarget) -> Result<()>;
}

/// Bundles an entry into a single ES module with esbuild.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    npx: PathBuf,
    minify: bool,
}

impl EsbuildBundler {
    pub fn new(npx: PathBuf) -> Self {
        EsbuildBundler { npx, minify: true }
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    fn command(&self, target: &BuildTarget) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.npx)
            .args(["--yes", "esbuild"])
            .arg(&target.entry)
            .args(["--bundle", "--format=esm", "--log-level=warning"])
            .arg(format!("--outfile={}", target.artifact_path().display()));

        if self.minify {
            cmd = cmd.arg("--minify");
        }

        match target.entry.parent() {
            Some(dir) => cmd.cwd(dir),
            None => cmd,
        }
    }
}

impl Bundler for EsbuildBundler {
    fn bundle(&self, target: &BuildTarget) -> Result<()> {
        if !target.entry.is_file() {
            bail!("entry file `{}` does not exist", target.entry.display());
        }

        let output = self.command(target).exec()?;
        if !output.status.success() {
            let message = combined_output(&output);
            bail!(
                "esbuild exited with code {:?}{}{}",
                output.status.code(),
                if message.is_empty() { "" } else { "\n" },
                message
            );
        }

        if !target.artifact_path().is_file() {
            bail!(
                "bundler reported success but `{}` was not written",
                target.artifact_path().display()
            );
        }

        Ok(())
    }
}

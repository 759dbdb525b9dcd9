//! Concurrent fan-out of bundling tasks.
//!
//! One task per target runs on a build-local rayon pool. Tasks share no
//! mutable state apart from the progress counter: each owns its output
//! directory, and results are collected by position, so the returned vector
//! lines up with the input targets whatever order the tasks finish in.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::builder::bundle::Bundler;
use crate::builder::entry::BuildTarget;
use crate::util::fs::reset_dir;
use crate::util::hash::sha256_file;
use crate::util::shell::Progress;

/// A successfully bundled target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundled {
    /// Path of the artifact
    pub artifact: PathBuf,

    /// SHA-256 of the artifact
    pub digest: String,
}

/// Result of one bundling task; the error is the tool's message.
pub type TaskResult = std::result::Result<Bundled, String>;

/// Runs bundling tasks concurrently.
pub struct BundleExecutor<'a> {
    bundler: &'a dyn Bundler,
    jobs: Option<usize>,
    progress: Option<&'a Progress>,
}

impl<'a> BundleExecutor<'a> {
    /// Create a new executor around a bundler.
    pub fn new(bundler: &'a dyn Bundler) -> Self {
        BundleExecutor {
            bundler,
            jobs: None,
            progress: None,
        }
    }

    /// Limit the number of concurrent tasks (None = one per CPU).
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Report each finished task to a progress bar.
    pub fn progress(mut self, progress: &'a Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Bundle all targets and return one result per target, in input order.
    pub fn execute(&self, targets: &[BuildTarget]) -> Vec<TaskResult> {
        let run = || -> Vec<TaskResult> {
            targets
                .par_iter()
                .map(|target| {
                    let result = self.run_task(target);
                    if let Some(progress) = self.progress {
                        progress.tick();
                    }
                    result
                })
                .collect()
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.unwrap_or(0))
            .thread_name(|i| format!("zerogen-bundle-{}", i))
            .build();

        match pool {
            Ok(pool) => pool.install(run),
            Err(e) => {
                tracing::warn!("falling back to the global thread pool: {}", e);
                run()
            }
        }
    }

    /// One task. A panicking bundler fails its own target only.
    fn run_task(&self, target: &BuildTarget) -> TaskResult {
        tracing::debug!("bundling `{}` from {}", target.package, target.entry.display());

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.bundle_one(target)));
        match attempt {
            Ok(Ok(bundled)) => Ok(bundled),
            Ok(Err(e)) => Err(format!("{:#}", e)),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(format!("bundler panicked: {}", message))
            }
        }
    }

    fn bundle_one(&self, target: &BuildTarget) -> Result<Bundled> {
        // Outputs are always fully replaced, never patched
        reset_dir(&target.out_dir)?;
        self.bundler.bundle(target)?;

        let artifact = target.artifact_path();
        let digest = sha256_file(&artifact)
            .with_context(|| format!("bundle for `{}` produced no artifact", target.package))?;

        Ok(Bundled { artifact, digest })
    }
}

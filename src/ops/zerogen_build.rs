//! Implementation of `zerogen build`.
//!
//! The build runs in three phases: discover the candidate packages, type
//! check the whole workspace once, then bundle every buildable candidate
//! concurrently. The report has one entry per candidate, in discovery order.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::builder::{
    BuildTarget, BundleExecutor, Bundler, Compiler, EntryResolver, InvalidOutDir, Resolution,
    TypecheckError,
};
use crate::core::package::Package;
use crate::core::workspace::{filter_by_name, list_packages, Workspace, WorkspaceError};
use crate::util::shell::{Shell, Status};

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Only build the package whose manifest declares this name
    pub package: Option<String>,

    /// Number of concurrent bundling tasks (None = one per CPU)
    pub jobs: Option<usize>,

    /// Per-package output directory name
    pub out_dir: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            package: None,
            jobs: None,
            out_dir: "dist".to_string(),
        }
    }
}

/// What happened to one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success { artifact: PathBuf, digest: String },
    Failure(String),
    Skipped(String),
}

/// One line of the build report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
    /// Package (directory) name
    pub package: String,

    pub outcome: BuildOutcome,
}

/// Per-package results of a build that got past the type check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub entries: Vec<BuildEntry>,
}

impl BuildReport {
    /// True when no package failed. Skipped packages do not count.
    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    pub fn successes(&self) -> usize {
        self.count(|o| matches!(o, BuildOutcome::Success { .. }))
    }

    pub fn failures(&self) -> usize {
        self.count(|o| matches!(o, BuildOutcome::Failure(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BuildOutcome::Skipped(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn count(&self, pred: impl Fn(&BuildOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Hard build failures: nothing was bundled.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Typecheck(#[from] TypecheckError),

    #[error(transparent)]
    OutDir(#[from] InvalidOutDir),
}

/// A candidate after entry resolution.
enum Slot {
    Target(BuildTarget),
    Skipped { package: String, reason: String },
}

/// Build the workspace.
pub fn build(
    ws: &Workspace,
    compiler: &dyn Compiler,
    bundler: &dyn Bundler,
    opts: &BuildOptions,
    shell: &Arc<Shell>,
) -> Result<BuildReport, BuildError> {
    let resolver = EntryResolver::new(opts.out_dir.clone())?;

    let mut candidates = list_packages(&ws.packages_dir())?;
    if let Some(name) = &opts.package {
        candidates = filter_by_name(&candidates, name);
        if candidates.is_empty() {
            shell.warn(format!("no package named `{}` in this workspace", name));
        }
    }

    if candidates.is_empty() {
        tracing::info!("nothing to build");
        return Ok(BuildReport::default());
    }

    shell.status(
        Status::Checking,
        format!("{} ({} packages)", ws.descriptor().name, candidates.len()),
    );
    compiler.typecheck(ws.root())?;

    let slots: Vec<Slot> = candidates
        .iter()
        .map(|dir| {
            let package = Package::load(dir);
            match resolver.resolve_package(&package) {
                Resolution::Target(target) => {
                    tracing::debug!(
                        "`{}` is a {}, entry {}",
                        target.package,
                        target.kind,
                        target.entry.display()
                    );
                    Slot::Target(target)
                }
                Resolution::Unbuildable(reason) => Slot::Skipped {
                    package: package.name().to_string(),
                    reason,
                },
            }
        })
        .collect();

    let targets: Vec<BuildTarget> = slots
        .iter()
        .filter_map(|slot| match slot {
            Slot::Target(target) => Some(target.clone()),
            Slot::Skipped { .. } => None,
        })
        .collect();

    for target in &targets {
        shell.verbose(Status::Bundling, format!("{} ({})", target.package, target.kind));
    }

    let progress = shell.progress(targets.len() as u64, "Bundling");
    let results = BundleExecutor::new(bundler)
        .jobs(opts.jobs)
        .progress(&progress)
        .execute(&targets);
    progress.finish();

    let mut results = results.into_iter();
    let entries = slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Skipped { package, reason } => BuildEntry {
                package,
                outcome: BuildOutcome::Skipped(reason),
            },
            Slot::Target(target) => {
                let outcome = match results.next() {
                    Some(Ok(bundled)) => BuildOutcome::Success {
                        artifact: bundled.artifact,
                        digest: bundled.digest,
                    },
                    Some(Err(reason)) => BuildOutcome::Failure(reason),
                    None => BuildOutcome::Failure("bundling task did not report".to_string()),
                };
                BuildEntry {
                    package: target.package,
                    outcome,
                }
            }
        })
        .collect();

    Ok(BuildReport { entries })
}

//! `zerogen build` command

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};

use crate::cli::BuildArgs;
use crate::commands::open_workspace;
use zerogen::builder::{EsbuildBundler, TscCompiler};
use zerogen::core::Workspace;
use zerogen::ops::zerogen_build::{build, BuildError, BuildOptions, BuildOutcome, BuildReport};
use zerogen::util::diagnostic::{emit, suggestions, Diagnostic};
use zerogen::util::fs::relative_path;
use zerogen::util::hash::short;
use zerogen::util::process::resolve_npx;
use zerogen::util::shell::{format_duration, Shell, Status};
use zerogen::util::GlobalContext;

pub fn execute(args: BuildArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let ws = open_workspace(&ctx)?;
    let config = ctx.config(ws.root());

    let npx = resolve_npx(config.build.npx.as_deref());
    let compiler = TscCompiler::new(npx.clone());
    let bundler = EsbuildBundler::new(npx).minify(config.build.minify);

    // Jobs: CLI > config > None (one per CPU)
    let opts = BuildOptions {
        package: args.package,
        jobs: args.jobs.or(config.build.jobs),
        out_dir: config.build.out_dir.clone(),
    };

    let start = Instant::now();
    let report = match build(&ws, &compiler, &bundler, &opts, shell) {
        Ok(report) => report,
        Err(BuildError::Typecheck(e)) => {
            let diagnostic = Diagnostic::error("type check failed")
                .with_location(ws.tsconfig_path())
                .with_context(e.diagnostics)
                .with_suggestion(suggestions::TYPECHECK_FAILED);
            emit(&diagnostic, shell.use_color());
            bail!("could not build `{}` due to type errors", ws.descriptor().name);
        }
        Err(BuildError::Workspace(e)) => return Err(e.into()),
        Err(e @ BuildError::OutDir(_)) => {
            return Err(anyhow::Error::new(e).context("invalid `[build].out_dir` setting"))
        }
    };

    print_report(&ws, &report, shell);

    if report.is_empty() {
        shell.status(Status::Info, "no packages to build");
        return Ok(());
    }

    if !report.is_success() {
        shell.verbose(Status::Info, suggestions::BUILD_FAILED);
        bail!(
            "{} of {} packages failed to bundle",
            report.failures(),
            report.entries.len()
        );
    }

    shell.status(
        Status::Finished,
        format!(
            "{} bundled, {} skipped in {}",
            report.successes(),
            report.skipped(),
            format_duration(start.elapsed())
        ),
    );
    Ok(())
}

/// One status line per package, in discovery order.
fn print_report(ws: &Workspace, report: &BuildReport, shell: &Shell) {
    for entry in &report.entries {
        match &entry.outcome {
            BuildOutcome::Success { artifact, digest } => shell.status(
                Status::Finished,
                format!(
                    "{} -> {} [{}]",
                    entry.package,
                    relative_path(ws.root(), artifact).display(),
                    short(digest)
                ),
            ),
            BuildOutcome::Failure(reason) => {
                shell.status(Status::Failed, format!("{}: {}", entry.package, reason))
            }
            BuildOutcome::Skipped(reason) => {
                shell.status(Status::Skipped, format!("{} ({})", entry.package, reason))
            }
        }
    }

    if report.skipped() > 0 {
        shell.verbose(Status::Info, suggestions::NO_ENTRY);
    }
}

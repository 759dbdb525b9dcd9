//! `zerogen new` command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::NewArgs;
use zerogen::ops::zerogen_new::{new_workspace, NewOptions};
use zerogen::util::shell::{Shell, Status};
use zerogen::util::GlobalContext;

/// Where the workspace goes: `--path` if given, else `<cwd>/<name>`.
pub fn workspace_path(cwd: &Path, name: &str, path: Option<PathBuf>) -> PathBuf {
    match path {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd.join(name),
    }
}

pub fn execute(args: NewArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let path = workspace_path(ctx.cwd(), &args.name, args.path);

    let opts = NewOptions {
        name: args.name.clone(),
        install: args.install,
        npm: None,
    };
    new_workspace(&path, &opts, shell)?;

    shell.status(
        Status::Info,
        format!(
            "run `zerogen generate component <name>` inside {} to add a package",
            path.display()
        ),
    );

    Ok(())
}

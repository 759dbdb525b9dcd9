//! Command implementations

pub mod build;
pub mod completions;
pub mod generate;
pub mod new;
pub mod serve;
pub mod start;

use anyhow::Result;
use zerogen::core::Workspace;
use zerogen::util::GlobalContext;

/// Open the workspace containing the current directory.
pub fn open_workspace(ctx: &GlobalContext) -> Result<Workspace> {
    let root = ctx.find_workspace_root()?;
    let ws = Workspace::load(&root)?;
    tracing::debug!("workspace `{}` at {}", ws.descriptor().name, ws.root().display());
    Ok(ws)
}

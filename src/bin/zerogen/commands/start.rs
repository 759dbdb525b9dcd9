//! `zerogen start` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::StartArgs;
use crate::commands::open_workspace;
use zerogen::ops::zerogen_serve::start_dev_server;
use zerogen::util::{GlobalContext, Shell};

pub fn execute(args: StartArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let ws = open_workspace(&ctx)?;
    let config = ctx.config(ws.root());

    // CLI > config > default
    let port = args.port.unwrap_or(config.serve.port);

    start_dev_server(&ws, port, config.build.npx.as_deref(), shell)
}

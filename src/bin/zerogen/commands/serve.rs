//! `zerogen serve` command

use std::sync::Arc;

use anyhow::Result;

use crate::commands::open_workspace;
use zerogen::ops::zerogen_serve::{start_plugin_server, PluginServerSettings};
use zerogen::util::{GlobalContext, Shell};

pub fn execute(shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let ws = open_workspace(&ctx)?;
    let config = ctx.config(ws.root());

    start_plugin_server(&ws, &PluginServerSettings::from(&config.serve), shell)
}

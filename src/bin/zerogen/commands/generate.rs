//! `zerogen generate` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GenerateArgs, GenerateKind};
use crate::commands::open_workspace;
use zerogen::core::Kind;
use zerogen::ops::zerogen_generate::{generate_package, GenerateOptions};
use zerogen::util::fs::relative_path;
use zerogen::util::shell::{Shell, Status};
use zerogen::util::GlobalContext;

pub fn execute(args: GenerateArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let ws = open_workspace(&ctx)?;

    let (kind, package) = match args.what {
        GenerateKind::Component(package) => (Kind::Component, package),
        GenerateKind::Module(package) => (Kind::Module, package),
    };

    let opts = GenerateOptions {
        kind,
        name: package.name,
        description: package.description,
    };
    let result = generate_package(&ws, &opts, shell)?;

    shell.verbose(
        Status::Info,
        format!("entry {}", relative_path(ws.root(), &result.source_file).display()),
    );

    Ok(())
}

//! zerogen CLI - plugin workspace scaffolding and builds

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zerogen::core::WorkspaceError;
use zerogen::util::Shell;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        // Workspace errors carry help text; let miette render it
        match e.downcast::<WorkspaceError>() {
            Ok(ws_err) => eprintln!("{:?}", miette::Report::new(ws_err)),
            Err(e) => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("zerogen=debug")
    } else {
        EnvFilter::new("zerogen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, cli.color));

    match cli.command {
        Commands::New(args) => commands::new::execute(args, &shell),
        Commands::Generate(args) => commands::generate::execute(args, &shell),
        Commands::Build(args) => commands::build::execute(args, &shell),
        Commands::Start(args) => commands::start::execute(args, &shell),
        Commands::Serve => commands::serve::execute(&shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

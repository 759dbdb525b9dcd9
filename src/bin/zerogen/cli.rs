//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use zerogen::util::shell::ColorChoice;

/// zerogen - scaffold plugin workspaces and bundle their packages
#[derive(Parser)]
#[command(name = "zerogen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_color(s: &str) -> Result<ColorChoice, String> {
    s.parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new plugin workspace
    New(NewArgs),

    /// Generate a component or module package
    #[command(alias = "g")]
    Generate(GenerateArgs),

    /// Type check and bundle the workspace packages
    Build(BuildArgs),

    /// Start the development server
    Start(StartArgs),

    /// Start the plugin server
    Serve,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Plugin name
    pub name: String,

    /// Directory to create the workspace in (defaults to ./<name>)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Run `npm install` after scaffolding
    #[arg(long)]
    pub install: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    pub what: GenerateKind,
}

#[derive(Subcommand)]
pub enum GenerateKind {
    /// Generate a Lit component package
    #[command(alias = "c")]
    Component(PackageArgs),

    /// Generate a module package
    #[command(alias = "m")]
    Module(PackageArgs),
}

#[derive(Args)]
pub struct PackageArgs {
    /// Package name
    pub name: String,

    /// Description stored in package.json
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Only build the package with this name
    pub package: Option<String>,

    /// Number of parallel bundling jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct StartArgs {
    /// Dev server port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

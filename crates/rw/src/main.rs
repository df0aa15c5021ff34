//! RW CLI - Schema documentation renderer.
//!
//! Provides commands for:
//! - `render`: Expand schema directives in one markdown file
//! - `build`: Expand schema directives in every page of a docs tree
//! - `tables`: List the tables of the configured schema

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, RenderArgs, TablesArgs};
use output::Output;

/// RW - Schema documentation renderer.
#[derive(Parser)]
#[command(name = "rw", version, about)]
struct Cli {
    /// Enable verbose output (schema loading and tag processing logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one markdown file with schema directives expanded.
    Render(RenderArgs),
    /// Render every markdown file in the docs source directory.
    Build(BuildArgs),
    /// List tables of the configured schema.
    Tables(TablesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Tables(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

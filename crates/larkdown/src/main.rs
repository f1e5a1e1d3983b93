//! larkdown CLI - Markdown publisher for Feishu docs.
//!
//! Provides commands for:
//! - `publish`: Create a new document from a markdown file
//! - `update`: Overwrite an existing document's content

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PublishArgs, UpdateArgs};
use output::Output;

/// larkdown - Publish markdown to Feishu docs.
#[derive(Parser)]
#[command(name = "larkdown", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a markdown file as a new document.
    Publish(PublishArgs),
    /// Overwrite an existing document from a markdown file.
    Update(UpdateArgs),
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
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Publish(args) => args.execute(),
        Commands::Update(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

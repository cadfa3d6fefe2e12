//! quiltro CLI - Gemtext to HTML renderer.
//!
//! Provides commands for:
//! - `render`: Render gemtext files (or stdin) to HTML fragments
//! - `check`: Parse gemtext files and report unterminated blocks

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, RenderArgs};
use output::Output;

/// quiltro - Gemtext to HTML renderer.
#[derive(Parser)]
#[command(name = "quiltro", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render gemtext to HTML.
    Render(RenderArgs),
    /// Check gemtext files for unterminated blocks.
    Check(CheckArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Render(args) => args.verbose,
            Self::Check(args) => args.verbose,
        }
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Logs go to stderr; stdout carries rendered HTML.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.command.verbose()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

//! Matchpoint CLI - import, export, and inspect stored doubles matches.
//!
//! Matches reach the store one of two ways: recorded live (by an embedding
//! application driving `scoring::MatchState`) or imported here from a CSV
//! export. The CLI covers the round trip and basic inspection:
//!
//! - `import <csv>`: decode an export, resolve player profiles, persist the
//!   match, and fold it into career totals.
//! - `export <id>`: re-encode a stored match's point log.
//! - `list` / `show <id>`: browse what is stored.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

/// Top-level CLI arguments for Matchpoint.
#[derive(Parser)]
#[command(name = "matchpoint", about = "Doubles tennis match tracking and statistics")]
struct Cli {
    /// Override the data directory used for stored matches and profiles.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a match from an exported CSV file.
    Import {
        /// Path to the CSV file.
        csv: PathBuf,

        /// Video file name to attach to the imported match.
        #[arg(long)]
        video: Option<String>,
    },
    /// Re-export a stored match's point log as CSV.
    Export {
        /// Match id, as shown by `list`.
        id: String,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored matches, most recent first.
    List,
    /// Show the score line and per-player statistics of a stored match.
    Show {
        /// Match id, as shown by `list`.
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(config::get_data_dir);
    tracing::debug!("Using data directory: {}", data_dir.display());

    match cli.command {
        Commands::Import { csv, video } => commands::import(&data_dir, &csv, video),
        Commands::Export { id, output } => commands::export(&data_dir, &id, output.as_deref()),
        Commands::List => commands::list(&data_dir),
        Commands::Show { id } => commands::show(&data_dir, &id),
    }
}

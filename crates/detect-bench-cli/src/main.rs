//! detect-bench CLI - object-detection contest scoring tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

/// Object-detection contest harness and scorer.
#[derive(Parser)]
#[command(name = "detect-bench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (per-object matching decisions)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score team results against golden labels
    Score {
        /// Path to teams folder (example: './sample_team')
        teams_folder: PathBuf,

        /// Path to golden label directory (example: './train/label')
        label_folder: PathBuf,

        /// Score multiple teams (teams_folder contains a directory per team)
        #[arg(long)]
        multiple_teams: bool,

        /// Write a CSV scoreboard
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the full scores as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Show how a contest image directory is split into batches
    Catalog {
        /// Image directory
        image_dir: PathBuf,

        /// Images per batch
        #[arg(short, long, default_value_t = 1000)]
        batch_size: usize,

        /// Image file extension
        #[arg(long, default_value = "jpg")]
        extension: String,
    },

    /// Summarize a stored results file
    Report {
        /// Results file
        #[arg(default_value = "results.json")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Score { teams_folder, label_folder, multiple_teams, csv, json } => {
            commands::score::run(&teams_folder, &label_folder, multiple_teams, csv, json)
        }
        Commands::Catalog { image_dir, batch_size, extension } => {
            commands::catalog::run(&image_dir, batch_size, &extension, cli.verbose)
        }
        Commands::Report { path } => commands::report::run(&path),
    }
}

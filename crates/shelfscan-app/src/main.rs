// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shelfscan command-line bookshelf scanner.
//
// Entry point. Initialises logging, parses arguments and dispatches to the
// subcommands. Results go to stdout as JSON; logs and human-readable errors go
// to stderr.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shelfscan_core::ScanConfig;
use shelfscan_core::error::Result;
use shelfscan_core::human_errors::humanize_error;

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(version, about = "Turn text read off a bookshelf photo into book records")]
#[command(propagate_version = true)]
struct Cli {
    /// JSON file overriding the default scan thresholds.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split whole-image OCR lines (a JSON array of lines with positions) into books.
    Segment {
        /// Path to the lines JSON file.
        lines: PathBuf,
    },
    /// Read the book on a single spine from its OCR lines.
    Blocks {
        /// Path to the lines JSON file.
        lines: PathBuf,
    },
    /// Scan a shelf photo end to end with the local OCR engine.
    Scan {
        /// Shelf photo (JPEG, PNG, ...).
        image: PathBuf,
        /// JSON array of region proposals from an external spine detector.
        #[arg(long)]
        regions: Option<PathBuf>,
        /// Directory holding `text-detection.rten` and `text-recognition.rten`.
        #[arg(long)]
        models: Option<PathBuf>,
        /// Clockwise rotation applied before scanning (multiple of 90).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        rotate: i32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("{}", human.suggestion);
            eprintln!("({err})");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };

    match cli.command {
        Command::Segment { lines } => commands::segment(&lines, &config, cli.pretty),
        Command::Blocks { lines } => commands::blocks(&lines, &config, cli.pretty),
        Command::Scan {
            image,
            regions,
            models,
            rotate,
        } => {
            let options = commands::ScanOptions {
                image,
                regions,
                models,
                rotate,
            };
            commands::scan(options, config, cli.pretty).await
        }
    }
}

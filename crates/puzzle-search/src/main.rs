//! CLI entry point for the puzzle runner.
//!
//! Usage:
//!   puzzle-search list
//!   puzzle-search run <PUZZLE> <input.txt> [options]
//!   puzzle-search run <PUZZLE> --stdin [options]
//!
//! Options:
//!   --part <1|2>   Only answer one part (default: both)
//!   --json         Print the report as JSON
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default: warn).

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use puzzle_search::{run, Part, PuzzleKind, RunConfig, RunReport};

#[derive(Parser)]
#[command(name = "puzzle-search")]
#[command(about = "Solve puzzles with breadth-first and branch-and-bound search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available puzzles
    List,
    /// Process a puzzle input and print the answers
    Run {
        /// Puzzle to solve
        #[arg(value_enum)]
        puzzle: PuzzleKind,

        /// Path to the puzzle input (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the input from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Only answer this part
        #[arg(long, value_enum)]
        part: Option<Part>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for kind in PuzzleKind::ALL {
                println!("{:<14} {}", kind.name(), kind.description());
            }
        }
        Commands::Run {
            puzzle,
            file,
            stdin,
            part,
            json,
        } => {
            let text = read_input(file, stdin)?;
            let report = run(puzzle, &text, &RunConfig { part })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }
    Ok(())
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file {}", path.display()))
    } else {
        bail!("Must provide either a file path or --stdin");
    }
}

fn print_report(report: &RunReport) {
    println!("Processing {} input took {:.4} ms.", report.puzzle, report.processing_ms);
    for part in &report.parts {
        println!("Part {} result: {} ({:.4} ms)", part.part, part.answer, part.time_elapsed_ms);
    }
}

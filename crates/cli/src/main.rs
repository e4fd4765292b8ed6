// kvkstat CLI - headless scan scoring operations

mod compare;
mod exit_codes;
mod ingest;
mod inspect;
mod score;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

/// Structured command failure: an exit code from the registry, a
/// message for stderr, and an optional hint.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[derive(Parser)]
#[command(name = "kvkstat")]
#[command(about = "KVK scan reconciliation and DKP scoring")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score start/end scans and export per-governor DKP rows
    #[command(after_help = "\
Examples:
  kvkstat score --start pre.xlsx --end post.xlsx
  kvkstat score --start pre.xlsx --end post.xlsx -o dkp.csv
  kvkstat score --start a.xlsx --start b.xlsx --end final.xlsx --min-th 16
  kvkstat score --start pre.xlsx --end post.xlsx --config scoring.toml --json")]
    Score {
        /// Start-phase scan file (repeatable; applied in order)
        #[arg(long, value_name = "FILE", required = true)]
        start: Vec<PathBuf>,

        /// End-phase scan file (repeatable; applied in order)
        #[arg(long, value_name = "FILE", required = true)]
        end: Vec<PathBuf>,

        /// Scoring coefficients TOML (defaults used when omitted)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Keep only governors at or above this town hall level
        #[arg(long, value_name = "LEVEL")]
        min_th: Option<f64>,

        /// Restrict output to one kingdom
        #[arg(long, value_name = "KINGDOM")]
        kingdom: Option<String>,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o', value_name = "FILE")]
        out: Option<PathBuf>,

        /// Emit scored records as JSON instead of delimited text
        #[arg(long)]
        json: bool,
    },

    /// Roll scored kingdoms up into cross-kingdom comparison totals
    #[command(after_help = "\
Examples:
  kvkstat compare --start pre.xlsx --end post.xlsx
  kvkstat compare --start pre.xlsx --end post.xlsx --json")]
    Compare {
        /// Start-phase scan file (repeatable; applied in order)
        #[arg(long, value_name = "FILE", required = true)]
        start: Vec<PathBuf>,

        /// End-phase scan file (repeatable; applied in order)
        #[arg(long, value_name = "FILE", required = true)]
        end: Vec<PathBuf>,

        /// Scoring coefficients TOML (defaults used when omitted)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Keep only governors at or above this town hall level
        #[arg(long, value_name = "LEVEL")]
        min_th: Option<f64>,

        /// Emit totals as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode one scan file and report sheets, records, and date
    #[command(after_help = "\
Examples:
  kvkstat inspect scan.xlsx
  kvkstat inspect scan.xlsx --json")]
    Inspect {
        /// Scan file to decode
        file: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            start,
            end,
            config,
            min_th,
            kingdom,
            out,
            json,
        } => score::cmd_score(&start, &end, config.as_deref(), min_th, kingdom.as_deref(), out.as_deref(), json),
        Commands::Compare {
            start,
            end,
            config,
            min_th,
            json,
        } => compare::cmd_compare(&start, &end, config.as_deref(), min_th, json),
        Commands::Inspect { file, json } => inspect::cmd_inspect(&file, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

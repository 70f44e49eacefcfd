//! Skyguard CLI - Command-line interface for running and watching matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Skyguard - A deterministic tower-defense simulation
#[derive(Parser, Debug)]
#[command(name = "skyguard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter (e.g. debug, skyguard::wave=info); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single headless match with a scripted player
    Run {
        #[command(flatten)]
        game: cli::MatchArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the preamble
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to play a match in real time
    Watch {
        #[command(flatten)]
        game: cli::MatchArgs,
    },

    /// Run many headless matches in parallel and aggregate statistics
    Batch {
        #[command(flatten)]
        game: cli::MatchArgs,

        /// Number of matches to run (seeds increment from --seed)
        #[arg(short, long, default_value = "100")]
        matches: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Dump the static content tables as JSON
    Content {
        /// Table to dump (default: all)
        #[arg(short, long)]
        kind: Option<cli::ContentKind>,
    },

    /// Validate a match configuration file
    Validate {
        /// Configuration file (JSON)
        #[arg(required = true)]
        config: std::path::PathBuf,
    },
}

/// Install the stderr log subscriber.
///
/// The TUI owns the terminal, so `watch` keeps the console silent.
fn init_logging(log_level: Option<&str>, console_free: bool) {
    let filter = if console_free {
        EnvFilter::new("off")
    } else if let Some(directives) = log_level {
        EnvFilter::new(directives)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(
        args.log_level.as_deref(),
        matches!(args.command, Commands::Watch { .. }),
    );

    let result = match args.command {
        Commands::Run {
            game,
            format,
            quiet,
        } => cli::run::execute(&game, format, quiet),

        Commands::Watch { game } => cli::watch::execute(&game),

        Commands::Batch {
            game,
            matches,
            threads,
            format,
            progress,
        } => cli::batch::execute(&game, matches, threads, format, progress),

        Commands::Content { kind } => cli::content::execute(kind),

        Commands::Validate { config } => cli::validate::execute(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

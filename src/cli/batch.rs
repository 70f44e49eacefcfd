//! Batch command implementation.

#![allow(clippy::cast_precision_loss)]

use super::output::{JsonBatchResult, format_batch_csv, format_batch_text};
use super::{BatchFormat, CliError, MatchArgs};
use indicatif::{ProgressBar, ProgressStyle};
use skyguard::autopilot::StrategyKind;
use skyguard::batch::run_batch;
use std::time::Instant;

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub(crate) fn execute(
    args: &MatchArgs,
    matches: u64,
    threads: Option<usize>,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = args.resolve()?;
    let strategy = StrategyKind::from(args.strategy);
    let name = strategy.create().name();

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(matches);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_batch(config.seed, matches, &config, strategy)?;

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(stats.matches);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let per_sec = if duration.as_secs_f64() > 0.0 {
        stats.matches as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats, name));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} matches/sec)",
                duration.as_secs_f64(),
                per_sec
            );
        }
        BatchFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::from_stats(&stats))?;
            println!("{json}");
        }
        BatchFormat::Csv => print!("{}", format_batch_csv(&stats, name)),
    }

    Ok(())
}

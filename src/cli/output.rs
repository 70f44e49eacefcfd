//! Output formatting utilities for CLI.

use serde::Serialize;
use skyguard::MatchOutcome;
use skyguard::batch::{BatchStats, MatchResult};
use std::fmt::Write;

fn outcome_label(outcome: MatchOutcome) -> &'static str {
    match outcome {
        MatchOutcome::InProgress => "unfinished (tick cap)",
        MatchOutcome::Defeat => "defeat",
        MatchOutcome::Victory => "victory",
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult, strategy: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {})", result.seed);
    let _ = writeln!(
        output,
        "  Level {} with {} ({strategy} player)",
        result.level, result.hero
    );
    let _ = writeln!(output, "  Outcome: {}", outcome_label(result.outcome));
    let _ = writeln!(output, "  Wave: {}", result.wave);
    let _ = writeln!(output, "  Ticks: {}", result.ticks);
    let _ = writeln!(output, "  Lives: {}", result.lives);
    let _ = writeln!(
        output,
        "  Score: {}  Kills: {}  Leaks: {}",
        result.score, result.kills, result.leaks
    );
    let _ = writeln!(
        output,
        "  Towers: {}  Money: {:.0}",
        result.towers, result.money
    );

    output
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Total matches played.
    matches: u64,
    /// Matches won.
    victories: u64,
    /// Matches lost.
    defeats: u64,
    /// Matches stopped by the tick cap.
    unfinished: u64,
    /// Victory rate (0.0-1.0).
    victory_rate: f64,
    /// Average wave reached.
    mean_wave: f64,
    /// Average lives left.
    mean_lives: f64,
    /// Average score.
    mean_score: f64,
    /// Average match length in ticks.
    mean_ticks: f64,
}

impl JsonBatchResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &BatchStats) -> Self {
        Self {
            matches: stats.matches,
            victories: stats.victories,
            defeats: stats.defeats,
            unfinished: stats.unfinished,
            victory_rate: stats.victory_rate(),
            mean_wave: stats.mean_wave(),
            mean_lives: stats.mean_lives(),
            mean_score: stats.mean_score(),
            mean_ticks: stats.mean_ticks(),
        }
    }
}

/// Format batch stats as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats, strategy: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Batch Results ({} matches, {strategy} player)",
        stats.matches
    );
    output.push_str("========================================\n\n");
    let _ = writeln!(
        output,
        "  Victories: {} ({:.1}%)",
        stats.victories,
        stats.victory_rate() * 100.0
    );
    let _ = writeln!(output, "  Defeats: {}", stats.defeats);
    let _ = writeln!(output, "  Unfinished: {}", stats.unfinished);
    output.push('\n');
    let _ = writeln!(output, "  Mean wave reached: {:.2}", stats.mean_wave());
    let _ = writeln!(output, "  Mean lives left: {:.2}", stats.mean_lives());
    let _ = writeln!(output, "  Mean score: {:.1}", stats.mean_score());
    let _ = writeln!(output, "  Mean length: {:.0} ticks", stats.mean_ticks());

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats, strategy: &str) -> String {
    let mut output = String::new();

    // Header
    output.push_str(
        "strategy,matches,victories,defeats,unfinished,victory_rate,mean_wave,mean_lives,mean_score\n",
    );

    let _ = writeln!(
        output,
        "{},{},{},{},{},{:.4},{:.2},{:.2},{:.2}",
        strategy,
        stats.matches,
        stats.victories,
        stats.defeats,
        stats.unfinished,
        stats.victory_rate(),
        stats.mean_wave(),
        stats.mean_lives(),
        stats.mean_score()
    );

    output
}

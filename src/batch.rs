//! Headless matches.
//!
//! [`run_match`] is a pure function from a seed, a configuration and a
//! scripted player to a [`MatchResult`]. It drives a real [`MatchSession`]
//! on a [`ManualClock`] that advances one display frame at a time, so the
//! rate-limited and real-time parts behave as they would on screen.
//!
//! [`run_batch`] spreads many seeds over the rayon thread pool and folds
//! the results into [`BatchStats`].

#![allow(clippy::cast_precision_loss)]

use std::time::Duration;

use rayon::prelude::*;
use serde::Serialize;

use crate::autopilot::StrategyKind;
use crate::config::MatchConfig;
use crate::content::HeroId;
use crate::error::MatchError;
use crate::game::{MatchOutcome, MatchState};
use crate::scheduler::ManualClock;
use crate::session::MatchSession;

/// Simulated real time between frames of a headless match.
pub const FRAME_STEP: Duration = Duration::from_millis(17);

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    /// Seed the match ran with.
    pub seed: u64,
    /// Level id.
    pub level: u32,
    /// Hero brought in.
    pub hero: HeroId,
    /// How the match ended; in progress if the tick cap was hit.
    pub outcome: MatchOutcome,
    /// Wave counter at the end.
    pub wave: u32,
    /// Logical ticks played.
    pub ticks: u64,
    /// Lives left.
    pub lives: u32,
    /// Final score.
    pub score: u64,
    /// Enemies killed.
    pub kills: u32,
    /// Enemies that reached the goal.
    pub leaks: u32,
    /// Towers standing at the end.
    pub towers: usize,
    /// Money left.
    pub money: f64,
}

impl MatchResult {
    /// Summarize a match state.
    #[must_use]
    pub fn from_state(seed: u64, state: &MatchState) -> Self {
        Self {
            seed,
            level: state.level.id,
            hero: state.hero.id,
            outcome: state.outcome,
            wave: state.wave,
            ticks: state.tick,
            lives: state.lives,
            score: state.score,
            kills: state.kills,
            leaks: state.leaks,
            towers: state.towers.len(),
            money: state.money,
        }
    }
}

/// Run one headless match to its end or to the configured tick cap.
///
/// # Determinism
///
/// Given the same seed, configuration and strategy, this function always
/// produces the same `MatchResult`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run_match(
    seed: u64,
    config: &MatchConfig,
    strategy: StrategyKind,
) -> Result<MatchResult, MatchError> {
    let config = MatchConfig {
        seed,
        ..config.clone()
    };
    let max_ticks = config.max_ticks;
    let clock = ManualClock::new();
    let mut session = MatchSession::with_clock(config, clock.clone())?;
    let mut player = strategy.create();

    while !session.state().is_terminal() && session.state().tick < max_ticks {
        clock.advance(FRAME_STEP);
        let commands = player.decide(&session.snapshot());
        for command in commands {
            session.apply(command);
        }
        session.frame();
    }
    Ok(MatchResult::from_state(seed, session.state()))
}

/// Aggregated statistics over many matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchStats {
    /// Matches played.
    pub matches: u64,
    /// Matches won.
    pub victories: u64,
    /// Matches lost.
    pub defeats: u64,
    /// Matches stopped by the tick cap.
    pub unfinished: u64,
    total_wave: u64,
    total_lives: u64,
    total_score: u64,
    total_ticks: u64,
}

impl BatchStats {
    /// Add a match result.
    pub fn add(&mut self, result: &MatchResult) {
        self.matches += 1;
        match result.outcome {
            MatchOutcome::Victory => self.victories += 1,
            MatchOutcome::Defeat => self.defeats += 1,
            MatchOutcome::InProgress => self.unfinished += 1,
        }
        self.total_wave += u64::from(result.wave);
        self.total_lives += u64::from(result.lives);
        self.total_score += result.score;
        self.total_ticks += result.ticks;
    }

    /// Fold another partial aggregate into this one.
    pub fn merge(&mut self, other: &Self) {
        self.matches += other.matches;
        self.victories += other.victories;
        self.defeats += other.defeats;
        self.unfinished += other.unfinished;
        self.total_wave += other.total_wave;
        self.total_lives += other.total_lives;
        self.total_score += other.total_score;
        self.total_ticks += other.total_ticks;
    }

    fn mean(&self, total: u64) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            total as f64 / self.matches as f64
        }
    }

    /// Fraction of matches won (0.0-1.0).
    #[must_use]
    pub fn victory_rate(&self) -> f64 {
        self.mean(self.victories)
    }

    /// Average wave reached.
    #[must_use]
    pub fn mean_wave(&self) -> f64 {
        self.mean(self.total_wave)
    }

    /// Average lives left.
    #[must_use]
    pub fn mean_lives(&self) -> f64 {
        self.mean(self.total_lives)
    }

    /// Average score.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        self.mean(self.total_score)
    }

    /// Average match length in ticks.
    #[must_use]
    pub fn mean_ticks(&self) -> f64 {
        self.mean(self.total_ticks)
    }
}

/// Run `matches` headless matches on seeds `base_seed..` in parallel.
///
/// Each rayon worker folds into its own [`BatchStats`]; the partial
/// aggregates are merged at the end.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run_batch(
    base_seed: u64,
    matches: u64,
    config: &MatchConfig,
    strategy: StrategyKind,
) -> Result<BatchStats, MatchError> {
    config.validate()?;
    let stats = (0..matches)
        .into_par_iter()
        .fold(BatchStats::default, |mut local, i| {
            if let Ok(result) = run_match(base_seed.wrapping_add(i), config, strategy) {
                local.add(&result);
            }
            local
        })
        .reduce(BatchStats::default, |mut a, b| {
            a.merge(&b);
            a
        });
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> MatchConfig {
        MatchConfig {
            max_ticks: 2_000,
            ..MatchConfig::default()
        }
    }

    #[test]
    fn test_run_match_is_deterministic() {
        let config = short_config();
        let a = run_match(7, &config, StrategyKind::Greedy).unwrap();
        let b = run_match(7, &config, StrategyKind::Greedy).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.ticks, 2_000);
    }

    #[test]
    fn test_idle_player_builds_nothing() {
        let config = MatchConfig {
            max_ticks: 5_000,
            ..MatchConfig::default()
        };
        let result = run_match(1, &config, StrategyKind::Idle).unwrap();
        assert_eq!(result.towers, 0);
        assert_eq!(result.lives + result.leaks, 20);
    }

    #[test]
    fn test_greedy_builds() {
        let result = run_match(3, &short_config(), StrategyKind::Greedy).unwrap();
        assert!(result.towers > 0);
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = MatchConfig {
            level: 0,
            ..MatchConfig::default()
        };
        assert!(run_match(1, &config, StrategyKind::Idle).is_err());
        assert!(run_batch(1, 4, &config, StrategyKind::Idle).is_err());
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let config = MatchConfig {
            max_ticks: 500,
            ..MatchConfig::default()
        };
        let stats = run_batch(10, 4, &config, StrategyKind::Greedy).unwrap();
        let mut expected = BatchStats::default();
        for seed in 10..14 {
            expected.add(&run_match(seed, &config, StrategyKind::Greedy).unwrap());
        }
        assert_eq!(stats, expected);
        assert_eq!(stats.matches, 4);
        assert_eq!(stats.unfinished, 4);
    }

    #[test]
    fn test_empty_stats_have_zero_means() {
        let stats = BatchStats::default();
        assert!(stats.victory_rate().abs() < f64::EPSILON);
        assert!(stats.mean_score().abs() < f64::EPSILON);
    }
}

//! CLI command implementations for Skyguard.

pub(crate) mod batch;
pub(crate) mod content;
pub(crate) mod run;
pub(crate) mod validate;
pub(crate) mod watch;

mod output;

use clap::{Args, ValueEnum};
use skyguard::autopilot::StrategyKind;
use skyguard::content::{HeroId, TalentId, TalentSelection};
use skyguard::{ConfigError, MatchConfig, MatchError};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Scripted player driving a headless match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    /// Never acts.
    Idle,
    /// Builds, upgrades and fights whenever it can.
    Greedy,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Idle => StrategyKind::Idle,
            StrategyArg::Greedy => StrategyKind::Greedy,
        }
    }
}

/// Static table selected by the `content` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ContentKind {
    /// Hero roster with talent trees.
    Heroes,
    /// Enemy roster.
    Enemies,
    /// Tower roster with every tier.
    Towers,
    /// Level layouts.
    Levels,
}

/// Flags shared by every command that sets up a match.
///
/// Flags override values loaded from `--config`.
#[derive(Debug, Clone, Args)]
pub(crate) struct MatchArgs {
    /// Match configuration file (JSON)
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Random seed
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Level id (1-8)
    #[arg(short, long)]
    pub(crate) level: Option<u32>,

    /// Hero id (rin, yuki, sakura, tamamo, ibaraki)
    #[arg(long)]
    pub(crate) hero: Option<HeroId>,

    /// Talent ids, comma separated (e.g. rin_t1_hp,rin_t2_burn)
    #[arg(long, value_delimiter = ',')]
    pub(crate) talents: Vec<TalentId>,

    /// Cap on logical ticks for headless matches
    #[arg(long)]
    pub(crate) max_ticks: Option<u64>,

    /// Scripted player
    #[arg(long, default_value = "greedy")]
    pub(crate) strategy: StrategyArg,
}

impl MatchArgs {
    /// Build and validate the match configuration.
    pub(crate) fn resolve(&self) -> Result<MatchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_json_file(path).map_err(|e| {
                CliError::new(format!("Failed to load {}: {e}", path.display()))
            })?,
            None => MatchConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(hero) = self.hero {
            config.hero = hero;
        }
        if !self.talents.is_empty() {
            config.talents = TalentSelection::from_talents(&self.talents);
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        config.validate()?;
        Ok(config)
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<MatchError> for CliError {
    fn from(e: MatchError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

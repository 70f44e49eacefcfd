//! Match configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::{HeroId, LevelDef, TalentSelection, level};
use crate::error::ConfigError;

/// Everything needed to set up a reproducible match.
///
/// Every field has a default, so a JSON file only needs to name what it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for every random draw in the match.
    pub seed: u64,
    /// Level id (1..=8).
    pub level: u32,
    /// Hero brought into the match.
    pub hero: HeroId,
    /// Talent picks for the hero.
    pub talents: TalentSelection,
    /// Lives at match start.
    pub starting_lives: u32,
    /// Victory once this many waves are cleared (defaults to the level's count).
    pub max_waves: Option<u32>,
    /// Money returned by selling any tower.
    pub sell_refund: f64,
    /// Soldier respawn delay in ticks for tiers 1, 2 and 3.
    pub soldier_respawn_ticks: [u32; 3],
    /// Money accrued every tick.
    pub passive_income_per_tick: f64,
    /// Headless runs stop after this many ticks.
    pub max_ticks: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            level: 1,
            hero: HeroId::Rin,
            talents: TalentSelection::default(),
            starting_lives: 20,
            max_waves: None,
            sell_refund: 50.0,
            soldier_respawn_ticks: [300, 200, 150],
            passive_income_per_tick: 0.05,
            max_ticks: 60 * 60 * 30,
        }
    }
}

impl MatchConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed configuration fails [`MatchConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration describes a playable match.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level_def()?;
        self.talents.validate(self.hero)?;
        if self.starting_lives == 0 {
            return Err(ConfigError::InvalidValue {
                field: "starting_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_waves == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_waves",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.sell_refund.is_finite() || self.sell_refund < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "sell_refund",
                reason: format!("{} is not a non-negative amount", self.sell_refund),
            });
        }
        if !self.passive_income_per_tick.is_finite() || self.passive_income_per_tick < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "passive_income_per_tick",
                reason: format!("{} is not a non-negative amount", self.passive_income_per_tick),
            });
        }
        if self.soldier_respawn_ticks.contains(&0) {
            return Err(ConfigError::InvalidValue {
                field: "soldier_respawn_ticks",
                reason: "respawn delays must be at least one tick".to_string(),
            });
        }
        Ok(())
    }

    /// The configured level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLevel`] if no such level exists.
    pub fn level_def(&self) -> Result<&'static LevelDef, ConfigError> {
        level(self.level).ok_or(ConfigError::UnknownLevel(self.level))
    }

    /// Waves that must be cleared for victory.
    #[must_use]
    pub fn victory_wave(&self, level: &LevelDef) -> u32 {
        self.max_waves.unwrap_or(level.waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TalentId;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.starting_lives, 20);
        assert_eq!(config.soldier_respawn_ticks, [300, 200, 150]);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"level": 3, "hero": "yuki", "talents": {"t1": "yuki_t1_range"}}"#;
        let config = MatchConfig::from_json_str(json).unwrap();
        assert_eq!(config.level, 3);
        assert_eq!(config.hero, HeroId::Yuki);
        assert_eq!(config.talents.t1, Some(TalentId::YukiT1Range));
        assert_eq!(config.seed, 42);
        assert_eq!(config.starting_lives, 20);
    }

    #[test]
    fn test_rejects_unknown_level() {
        let err = MatchConfig::from_json_str(r#"{"level": 12}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLevel(12)));
    }

    #[test]
    fn test_rejects_foreign_talent() {
        let json = r#"{"hero": "rin", "talents": {"t1": "yuki_t1_range"}}"#;
        let err = MatchConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::TalentNotInTree { .. }));
    }

    #[test]
    fn test_rejects_zero_lives() {
        let config = MatchConfig {
            starting_lives: 0,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "starting_lives", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = MatchConfig::from_json_str("{level: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 7, "level": 2, "sell_refund": 75.0}}"#).unwrap();
        let config = MatchConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.level, 2);
        assert!((config.sell_refund - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MatchConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_victory_wave_override() {
        let level = level(1).unwrap();
        let config = MatchConfig::default();
        assert_eq!(config.victory_wave(level), 9999);
        let config = MatchConfig {
            max_waves: Some(5),
            ..MatchConfig::default()
        };
        assert_eq!(config.victory_wave(level), 5);
    }
}

//! Error types for match setup.
//!
//! The simulation itself never fails: invalid player input is rejected as a
//! no-op. Errors only arise while building a match from configuration.

use std::fmt;

use crate::content::{HeroId, TalentId};

/// Errors raised while loading or validating a match configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The configuration file is not valid JSON for a match config.
    Parse(serde_json::Error),
    /// No level with this id exists.
    UnknownLevel(u32),
    /// An identifier did not name any hero.
    UnknownHero(String),
    /// An identifier did not name any talent.
    UnknownTalent(String),
    /// A talent was selected for a tier it does not belong to.
    TalentTierMismatch {
        /// Tier slot the talent was placed in.
        tier: u8,
        /// The misplaced talent.
        talent: TalentId,
    },
    /// A talent from another hero's tree was selected.
    TalentNotInTree {
        /// The hero of the match.
        hero: HeroId,
        /// The foreign talent.
        talent: TalentId,
    },
    /// A numeric field is out of its valid range.
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::UnknownLevel(id) => write!(f, "unknown level {id}"),
            ConfigError::UnknownHero(name) => write!(f, "unknown hero '{name}'"),
            ConfigError::UnknownTalent(name) => write!(f, "unknown talent '{name}'"),
            ConfigError::TalentTierMismatch { tier, talent } => {
                write!(f, "talent {} is not a tier {tier} talent", talent.as_str())
            }
            ConfigError::TalentNotInTree { hero, talent } => {
                write!(
                    f,
                    "talent {} is not in the talent tree of {}",
                    talent.as_str(),
                    hero.as_str()
                )
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors raised while setting up or driving a match session.
#[derive(Debug)]
pub enum MatchError {
    /// The match configuration is unusable.
    Config(ConfigError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Config(e) => write!(f, "invalid match configuration: {e}"),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for MatchError {
    fn from(e: ConfigError) -> Self {
        MatchError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ConfigError::UnknownLevel(42);
        assert_eq!(err.to_string(), "unknown level 42");

        let err = ConfigError::TalentNotInTree {
            hero: HeroId::Rin,
            talent: TalentId::YukiT1Range,
        };
        assert_eq!(
            err.to_string(),
            "talent yuki_t1_range is not in the talent tree of rin"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;
        let err = ConfigError::from(std::io::Error::other("boom"));
        assert!(err.source().is_some());
        assert!(ConfigError::UnknownLevel(9).source().is_none());
    }

    #[test]
    fn test_match_error_wraps_config_error() {
        use std::error::Error;
        let err = MatchError::from(ConfigError::UnknownLevel(12));
        assert_eq!(
            err.to_string(),
            "invalid match configuration: unknown level 12"
        );
        assert!(err.source().is_some());
    }
}

//! Static content tables.
//!
//! Immutable definitions for the hero roster, enemy kinds, tower kinds and
//! level layouts. Pure data keyed by stable identifiers; the simulation only
//! reads from here.

pub mod enemies;
pub mod heroes;
pub mod levels;
pub mod towers;

pub use enemies::{ENEMY_ROSTER, EnemyDef, EnemyKind};
pub use heroes::{HERO_ROSTER, HeroDef, HeroId, TalentId, TalentSelection, WeaponKind};
pub use levels::{LEVELS, LevelDef, level};
pub use towers::{ProjectileKind, TOWER_ROSTER, TierStats, TowerDef, TowerKind};

/// Logical simulation rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Convert a millisecond interval to logical ticks, rounding up.
#[must_use]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (u64::from(ms) * u64::from(TICKS_PER_SECOND)).div_ceil(1000)
}

/// Convert a (possibly fractional) number of seconds to logical ticks.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn secs_to_ticks(secs: f64) -> u64 {
    (secs * f64::from(TICKS_PER_SECOND)).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks_rounds_up() {
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(600), 36);
        assert_eq!(ms_to_ticks(150), 9);
        assert_eq!(ms_to_ticks(900), 54);
        assert_eq!(ms_to_ticks(10), 1);
        assert_eq!(ms_to_ticks(0), 0);
    }

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(25.0), 1500);
        assert_eq!(secs_to_ticks(20.0 * 0.75), 900);
    }

    #[test]
    fn test_every_tower_has_three_branches_with_costs() {
        for def in &TOWER_ROSTER {
            assert!(def.t1.cost > 0);
            assert!(def.t2.cost > 0);
            for branch in &def.t3 {
                assert!(branch.cost > 0, "{:?} branch without cost", def.kind);
            }
        }
    }

    #[test]
    fn test_talent_trees_belong_to_their_hero() {
        for hero in &HERO_ROSTER {
            for (tier, options) in hero.talents.iter().enumerate() {
                for talent in *options {
                    assert_eq!(talent.hero(), hero.id);
                    assert_eq!(usize::from(talent.tier()), tier + 1);
                }
            }
        }
    }
}

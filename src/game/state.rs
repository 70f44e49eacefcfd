//! Match state management.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::MatchConfig;
use crate::content::{LevelDef, TowerKind};
use crate::error::ConfigError;
use crate::game::{
    Blocker, Enemy, EnemyId, Hero, IdAllocator, Particle, Projectile, ProjectileId, SkillEffect,
    Tier, Tower, TowerId,
};
use crate::geom::Vec2;

/// How a match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Still being played.
    InProgress,
    /// Lives ran out.
    Defeat,
    /// Every wave of the level was cleared.
    Victory,
}

impl MatchOutcome {
    /// Whether the simulation is frozen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, MatchOutcome::InProgress)
    }
}

/// Balance knobs copied out of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchRules {
    /// Flat amount refunded by selling a tower.
    pub sell_refund: f64,
    /// Soldier respawn delay per tower tier.
    pub soldier_respawn_ticks: [u32; 3],
    /// Money accrued every tick.
    pub passive_income_per_tick: f64,
}

impl MatchRules {
    /// Respawn delay for soldiers of a tower at `tier`.
    #[must_use]
    pub fn soldier_respawn(&self, tier: Tier) -> u32 {
        self.soldier_respawn_ticks[usize::from(tier.number() - 1)]
    }
}

impl From<&MatchConfig> for MatchRules {
    fn from(config: &MatchConfig) -> Self {
        Self {
            sell_refund: config.sell_refund,
            soldier_respawn_ticks: config.soldier_respawn_ticks,
            passive_income_per_tick: config.passive_income_per_tick,
        }
    }
}

/// Complete mutable state of one match.
///
/// Entity tables are keyed by monotonically allocated ids, so iterating a
/// table visits entities in spawn order. Every cross reference between
/// entities is an id that may have gone stale since the last tick.
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Level being played.
    pub level: &'static LevelDef,
    /// Current funds; fractional because of passive income.
    pub money: f64,
    /// Remaining lives.
    pub lives: u32,
    /// Lives at match start.
    pub starting_lives: u32,
    /// Current wave number, starting at 1.
    pub wave: u32,
    /// Victory once `wave` passes this.
    pub victory_wave: u32,
    /// Sum of rewards of killed enemies.
    pub score: u64,
    /// Enemies killed.
    pub kills: u32,
    /// Enemies that reached the goal.
    pub leaks: u32,
    /// Logical ticks simulated so far.
    pub tick: u64,
    /// Simulation paused by the player.
    pub paused: bool,
    /// Tower highlighted in the UI.
    pub selected_tower: Option<TowerId>,
    /// Terminal state, if reached.
    pub outcome: MatchOutcome,
    /// Active enemies.
    pub enemies: BTreeMap<EnemyId, Enemy>,
    /// Built towers.
    pub towers: BTreeMap<TowerId, Tower>,
    /// In-flight projectiles.
    pub projectiles: BTreeMap<ProjectileId, Projectile>,
    /// Cosmetic particles.
    pub particles: Vec<Particle>,
    /// The hero.
    pub hero: Hero,
    /// Skill animation currently showing.
    pub skill_effect: Option<SkillEffect>,
    /// Balance knobs.
    pub rules: MatchRules,
    pub(crate) ids: IdAllocator,
    pub(crate) rng: ChaCha8Rng,
}

impl MatchState {
    /// Set up a fresh match from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: &MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let level = config.level_def()?;
        Ok(Self {
            level,
            money: f64::from(level.start_money),
            lives: config.starting_lives,
            starting_lives: config.starting_lives,
            wave: 1,
            victory_wave: config.victory_wave(level),
            score: 0,
            kills: 0,
            leaks: 0,
            tick: 0,
            paused: false,
            selected_tower: None,
            outcome: MatchOutcome::InProgress,
            enemies: BTreeMap::new(),
            towers: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            particles: Vec::new(),
            hero: Hero::new(config.hero, config.talents, level.hero_return_point()),
            skill_effect: None,
            rules: MatchRules::from(config),
            ids: IdAllocator::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Whether the match has ended.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Whether `amount` can be spent.
    #[must_use]
    pub fn can_afford(&self, amount: u32) -> bool {
        self.money >= f64::from(amount)
    }

    /// Tower standing on the build slot at `pos`.
    #[must_use]
    pub fn tower_at(&self, pos: Vec2) -> Option<TowerId> {
        self.towers
            .values()
            .find(|tower| tower.pos.distance(pos) < 1.0)
            .map(|tower| tower.id)
    }

    /// Towers of one kind, in build order.
    pub fn towers_of(&self, kind: TowerKind) -> impl Iterator<Item = &Tower> {
        self.towers.values().filter(move |tower| tower.kind == kind)
    }

    /// Clear `blocker`'s hold on an enemy, if that enemy still exists.
    pub fn release(&mut self, enemy: EnemyId, blocker: Blocker) {
        if let Some(enemy) = self.enemies.get_mut(&enemy) {
            enemy.release_from(blocker);
        }
    }

    /// Release every enemy held by one of `tower`'s soldiers.
    pub fn release_soldiers_of(&mut self, tower: &Tower) {
        for soldier in &tower.soldiers {
            if let Some(target) = soldier.target {
                self.release(target, Blocker::Soldier(soldier.id));
            }
        }
    }

    /// Queue a cosmetic particle.
    pub fn emit(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Read-only view for presentation.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            level: self.level.id,
            tick: self.tick,
            wave: self.wave,
            money: self.money,
            lives: self.lives,
            score: self.score,
            kills: self.kills,
            paused: self.paused,
            outcome: self.outcome,
            selected_tower: self.selected_tower,
            enemies: self.enemies.values().collect(),
            towers: self.towers.values().collect(),
            projectiles: self.projectiles.values().collect(),
            particles: &self.particles,
            hero: &self.hero,
            skill_effect: self.skill_effect.as_ref(),
        }
    }
}

/// Borrowed per-tick view handed to renderers.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    /// Level id.
    pub level: u32,
    /// Logical tick.
    pub tick: u64,
    /// Current wave.
    pub wave: u32,
    /// Current funds.
    pub money: f64,
    /// Remaining lives.
    pub lives: u32,
    /// Score so far.
    pub score: u64,
    /// Enemies killed.
    pub kills: u32,
    /// Paused flag.
    pub paused: bool,
    /// Match outcome.
    pub outcome: MatchOutcome,
    /// Tower highlighted in the UI.
    pub selected_tower: Option<TowerId>,
    /// Active enemies in spawn order.
    pub enemies: Vec<&'a Enemy>,
    /// Towers with their soldiers, in build order.
    pub towers: Vec<&'a Tower>,
    /// In-flight projectiles.
    pub projectiles: Vec<&'a Projectile>,
    /// Cosmetic particles.
    pub particles: &'a [Particle],
    /// The hero.
    pub hero: &'a Hero,
    /// Skill animation, if showing.
    pub skill_effect: Option<&'a SkillEffect>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::HeroId;

    #[test]
    fn test_new_match_uses_level_economy() {
        let config = MatchConfig {
            level: 2,
            ..MatchConfig::default()
        };
        let state = MatchState::new(&config).unwrap();
        assert!((state.money - 900.0).abs() < f64::EPSILON);
        assert_eq!(state.lives, 20);
        assert_eq!(state.wave, 1);
        assert_eq!(state.outcome, MatchOutcome::InProgress);
        assert_eq!(state.hero.pos, state.level.hero_return_point());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = MatchConfig {
            level: 0,
            ..MatchConfig::default()
        };
        assert!(MatchState::new(&config).is_err());
    }

    #[test]
    fn test_soldier_respawn_by_tier() {
        let rules = MatchRules::from(&MatchConfig::default());
        assert_eq!(rules.soldier_respawn(Tier::One), 300);
        assert_eq!(rules.soldier_respawn(Tier::Two), 200);
        assert_eq!(rules.soldier_respawn(Tier::Three(1)), 150);
    }

    #[test]
    fn test_snapshot_serializes() {
        let config = MatchConfig {
            hero: HeroId::Yuki,
            ..MatchConfig::default()
        };
        let state = MatchState::new(&config).unwrap();
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["wave"], 1);
        assert_eq!(json["outcome"], "in_progress");
        assert_eq!(json["hero"]["id"], "yuki");
        assert!(json["enemies"].as_array().unwrap().is_empty());
    }
}

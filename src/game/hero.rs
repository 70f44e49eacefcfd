//! The hero: derived stats and live entity state.

use serde::Serialize;

use crate::content::{
    HeroDef, HeroId, ProjectileKind, TalentId, TalentSelection, WeaponKind, ms_to_ticks,
    secs_to_ticks,
};
use crate::game::EnemyId;
use crate::geom::Vec2;

/// Attack range of ranged heroes.
pub const RANGED_ATTACK_RANGE: f64 = 180.0;
/// Engagement (and attack) range of melee heroes.
pub const MELEE_RANGE: f64 = 30.0;
/// A ranged hero is only pinned down by enemies this close.
pub const RANGED_ENGAGE_RANGE: f64 = 10.0;
/// Hero movement speed, units per tick.
pub const HERO_SPEED: f64 = 3.0;
/// Base damage an engaged enemy deals to the hero per hit.
pub const ENEMY_HIT_DAMAGE: f64 = 5.0;

/// Stats fixed at match start from the definition plus talents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeroStats {
    /// Maximum hit points.
    pub max_hp: f64,
    /// Damage per strike or shot.
    pub attack: f64,
    /// Fraction of enemy damage absorbed.
    pub armor: f64,
    /// Ticks between skill activations.
    pub skill_cooldown_ticks: u64,
    /// Ticks dead before respawning.
    pub respawn_ticks: u64,
    /// Ranged attack range (melee heroes use [`MELEE_RANGE`]).
    pub range: f64,
    /// Ticks between ranged shots.
    pub attack_interval_ticks: u64,
    /// Weapon family.
    pub weapon: WeaponKind,
}

impl HeroStats {
    /// Apply tier-1 stat talents to a hero definition.
    #[must_use]
    pub fn derive(def: &HeroDef, talents: TalentSelection) -> Self {
        let mut max_hp = def.hp;
        let mut attack = def.attack;
        let mut armor = def.armor;
        let mut skill_cooldown_secs = def.skill_cooldown_secs;
        let mut range = if def.weapon.is_ranged() {
            RANGED_ATTACK_RANGE
        } else {
            MELEE_RANGE
        };
        let mut interval_ms = f64::from(def.weapon.attack_interval_ms());

        match talents.t1 {
            Some(TalentId::RinT1Hp) => max_hp += 300.0,
            Some(TalentId::IbarakiT1Hp) => max_hp += 400.0,
            Some(TalentId::RinT1Atk) => attack += 20.0,
            Some(TalentId::SakuraT1Dmg) => attack += 25.0,
            Some(TalentId::TamamoT1Ap) => attack += 30.0,
            Some(TalentId::SakuraT1Reload) => skill_cooldown_secs *= 0.8,
            Some(TalentId::TamamoT1Mp) => skill_cooldown_secs *= 0.75,
            Some(TalentId::IbarakiT1Armor) => armor += 0.3,
            Some(TalentId::YukiT1Range) => range += 50.0,
            Some(TalentId::YukiT1Spd) => interval_ms *= 0.8,
            _ => {}
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let interval_ms = interval_ms.round() as u32;

        Self {
            max_hp,
            attack,
            armor: armor.clamp(0.0, 1.0),
            skill_cooldown_ticks: secs_to_ticks(skill_cooldown_secs),
            respawn_ticks: secs_to_ticks(def.respawn_secs),
            range,
            attack_interval_ticks: ms_to_ticks(interval_ms),
            weapon: def.weapon,
        }
    }

    /// Damage taken from one enemy hit after armor.
    #[must_use]
    pub fn mitigate(&self, damage: f64) -> f64 {
        (damage * (1.0 - self.armor)).max(1.0)
    }

    /// Projectile fired by ranged heroes.
    #[must_use]
    pub const fn projectile_kind(&self) -> ProjectileKind {
        match self.weapon {
            WeaponKind::Gun => ProjectileKind::Bomb,
            WeaponKind::Magic => ProjectileKind::Magic,
            WeaponKind::Bow | WeaponKind::Sword | WeaponKind::Gauntlet => ProjectileKind::Arrow,
        }
    }
}

/// What the hero is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeroState {
    /// Standing; ranged heroes shoot from here.
    Idle,
    /// Walking to a move order.
    Moving,
    /// Locked in melee with one enemy.
    Fighting,
}

/// The single hero of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hero {
    /// Which hero.
    pub id: HeroId,
    /// Talent picks.
    pub talents: TalentSelection,
    /// Derived stats.
    pub stats: HeroStats,
    /// Current position.
    pub pos: Vec2,
    /// Current hit points.
    pub hp: f64,
    /// Waiting to respawn.
    pub dead: bool,
    /// Ticks until respawn while dead.
    pub respawn_timer: u64,
    /// Activity.
    pub state: HeroState,
    /// Destination while moving.
    pub move_target: Option<Vec2>,
    /// Enemy engaged in melee.
    pub fighting: Option<EnemyId>,
    /// Ticks until the skill can be used again.
    pub skill_cooldown: u64,
    /// Skill animation flag, cleared on a real-time delay.
    pub skill_active: bool,
    /// Tick of the last ranged shot.
    pub last_attack: Option<u64>,
}

impl Hero {
    /// Spawn a hero at `pos` with full health.
    #[must_use]
    pub fn new(id: HeroId, talents: TalentSelection, pos: Vec2) -> Self {
        let stats = HeroStats::derive(id.def(), talents);
        Self {
            id,
            talents,
            stats,
            pos,
            hp: stats.max_hp,
            dead: false,
            respawn_timer: 0,
            state: HeroState::Idle,
            move_target: None,
            fighting: None,
            skill_cooldown: 0,
            skill_active: false,
            last_attack: None,
        }
    }

    /// Whether a talent was picked.
    #[must_use]
    pub fn has(&self, talent: TalentId) -> bool {
        self.talents.has(talent)
    }

    /// Ranged heroes shoot; melee heroes brawl.
    #[must_use]
    pub const fn is_ranged(&self) -> bool {
        self.stats.weapon.is_ranged()
    }

    /// Whether the skill can be activated right now.
    #[must_use]
    pub const fn skill_ready(&self) -> bool {
        !self.dead && self.skill_cooldown == 0
    }

    /// Range at which an unblocked ground enemy pins the hero down.
    #[must_use]
    pub const fn engage_range(&self) -> f64 {
        if self.is_ranged() {
            RANGED_ENGAGE_RANGE
        } else {
            MELEE_RANGE
        }
    }

    /// Heal without exceeding max hp.
    pub fn heal(&mut self, amount: f64) {
        self.hp = (self.hp + amount).min(self.stats.max_hp);
    }

    /// Drop out of melee, returning the enemy that was engaged.
    pub fn disengage(&mut self) -> Option<EnemyId> {
        if self.state == HeroState::Fighting {
            self.state = HeroState::Idle;
        }
        self.fighting.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(id: HeroId, talents: &[TalentId]) -> HeroStats {
        HeroStats::derive(id.def(), TalentSelection::from_talents(talents))
    }

    #[test]
    fn test_range_talent_adds_exactly_fifty() {
        let base = stats(HeroId::Yuki, &[]);
        let ranged = stats(HeroId::Yuki, &[TalentId::YukiT1Range]);
        assert!((ranged.range - base.range - 50.0).abs() < f64::EPSILON);
        assert!((base.range - RANGED_ATTACK_RANGE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hp_and_attack_talents() {
        assert!((stats(HeroId::Rin, &[TalentId::RinT1Hp]).max_hp - 1000.0).abs() < 1e-9);
        assert!((stats(HeroId::Rin, &[TalentId::RinT1Atk]).attack - 60.0).abs() < 1e-9);
        assert!((stats(HeroId::Ibaraki, &[TalentId::IbarakiT1Hp]).max_hp - 1050.0).abs() < 1e-9);
        assert!((stats(HeroId::Tamamo, &[TalentId::TamamoT1Ap]).attack - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_cooldown_talents_shorten_skill() {
        assert_eq!(stats(HeroId::Sakura, &[]).skill_cooldown_ticks, 2400);
        assert_eq!(stats(HeroId::Sakura, &[TalentId::SakuraT1Reload]).skill_cooldown_ticks, 1920);
        assert_eq!(stats(HeroId::Tamamo, &[TalentId::TamamoT1Mp]).skill_cooldown_ticks, 1575);
    }

    #[test]
    fn test_attack_interval_by_weapon() {
        assert_eq!(stats(HeroId::Sakura, &[]).attack_interval_ticks, 36);
        assert_eq!(stats(HeroId::Yuki, &[]).attack_interval_ticks, 48);
        assert_eq!(stats(HeroId::Tamamo, &[]).attack_interval_ticks, 60);
        assert_eq!(stats(HeroId::Yuki, &[TalentId::YukiT1Spd]).attack_interval_ticks, 39);
    }

    #[test]
    fn test_armor_mitigation_floors_at_one() {
        let rin = stats(HeroId::Rin, &[]);
        assert!((rin.mitigate(ENEMY_HIT_DAMAGE) - 2.5).abs() < 1e-9);
        let armored = stats(HeroId::Ibaraki, &[TalentId::IbarakiT1Armor]);
        assert!((armored.mitigate(ENEMY_HIT_DAMAGE) - 1.5).abs() < 1e-9);
        let mut full = rin;
        full.armor = 1.0;
        assert!((full.mitigate(ENEMY_HIT_DAMAGE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_respawn_ticks() {
        assert_eq!(stats(HeroId::Rin, &[]).respawn_ticks, 15 * 60);
        assert_eq!(stats(HeroId::Ibaraki, &[]).respawn_ticks, 18 * 60);
    }

    #[test]
    fn test_new_hero_is_idle_at_full_health() {
        let hero = Hero::new(HeroId::Rin, TalentSelection::default(), Vec2::new(800.0, 150.0));
        assert!((hero.hp - 700.0).abs() < 1e-9);
        assert_eq!(hero.state, HeroState::Idle);
        assert!(hero.skill_ready());
        assert!(!hero.is_ranged());
    }
}

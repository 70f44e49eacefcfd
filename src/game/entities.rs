//! Per-match entity records: enemies, towers with their soldiers,
//! projectiles and cosmetic particles.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use crate::content::{EnemyKind, ProjectileKind, TierStats, TowerKind};
use crate::game::{EnemyId, ProjectileId, SoldierId, TowerId};
use crate::geom::Vec2;

/// Whoever is holding an enemy in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Blocker {
    /// A barracks soldier.
    Soldier(SoldierId),
    /// The hero.
    Hero,
}

/// Status effect countdowns, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusTimers {
    /// Halves movement speed while positive.
    pub freeze: u32,
    /// Drains hp each tick while positive.
    pub burn: u32,
    /// Stops movement and enemy attacks while positive.
    pub stun: u32,
}

impl StatusTimers {
    /// Raise the freeze timer to at least `ticks`.
    pub fn freeze_at_least(&mut self, ticks: u32) {
        self.freeze = self.freeze.max(ticks);
    }

    /// Whether the enemy is currently stunned.
    #[must_use]
    pub const fn is_stunned(self) -> bool {
        self.stun > 0
    }
}

/// An enemy walking a level path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Enemy {
    /// Table key.
    pub id: EnemyId,
    /// Enemy kind.
    pub kind: EnemyKind,
    /// Current position.
    pub pos: Vec2,
    /// Current hit points; dead at or below zero.
    pub hp: f64,
    /// Hit points at spawn.
    pub max_hp: f64,
    /// Base movement speed in units per tick.
    pub speed: f64,
    /// Index of the level path being walked.
    pub path: usize,
    /// Index of the last path point reached.
    pub path_index: usize,
    /// Flying enemies cannot be blocked. Fixed for the entity's lifetime.
    pub flying: bool,
    /// Unit currently blocking this enemy.
    pub blocked_by: Option<Blocker>,
    /// Status countdowns.
    pub status: StatusTimers,
    /// Reached the end of its path this tick.
    pub finished: bool,
}

impl Enemy {
    /// Whether the enemy still counts as alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Whether a ground unit can newly engage this enemy.
    #[must_use]
    pub fn is_engageable(&self) -> bool {
        self.is_alive() && !self.flying && self.blocked_by.is_none()
    }

    /// Clear the block if `blocker` holds it.
    pub fn release_from(&mut self, blocker: Blocker) {
        if self.blocked_by == Some(blocker) {
            self.blocked_by = None;
        }
    }
}

/// Upgrade stage of a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    /// As built.
    One,
    /// First upgrade.
    Two,
    /// Specialized into one of three branches.
    Three(usize),
}

impl Tier {
    /// Tier number, 1 to 3.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three(_) => 3,
        }
    }

    /// Branch index; tiers below 3 behave as branch 0.
    #[must_use]
    pub const fn branch(self) -> usize {
        match self {
            Tier::Three(branch) => branch,
            Tier::One | Tier::Two => 0,
        }
    }
}

/// A barracks soldier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Soldier {
    /// Identity.
    pub id: SoldierId,
    /// Position in the squad (0..3); picks the rally offset.
    pub slot: usize,
    /// Current position.
    pub pos: Vec2,
    /// Current hit points.
    pub hp: f64,
    /// Hit points when healthy.
    pub max_hp: f64,
    /// Damage per successful hit.
    pub damage: f64,
    /// Waiting to respawn.
    pub dead: bool,
    /// Ticks until respawn while dead.
    pub respawn_timer: u32,
    /// Enemy being fought or chased.
    pub target: Option<EnemyId>,
}

/// A built tower.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tower {
    /// Table key.
    pub id: TowerId,
    /// Tower kind.
    pub kind: TowerKind,
    /// Build slot it occupies.
    pub pos: Vec2,
    /// Upgrade stage.
    pub tier: Tier,
    /// Tick of the last attack or payout.
    pub last_attack: Option<u64>,
    /// Number of purchases made on this tower.
    pub level: u32,
    /// Where soldiers gather (barracks only).
    pub rally_point: Option<Vec2>,
    /// Owned soldiers; empty unless a barracks.
    pub soldiers: Vec<Soldier>,
    /// Marked by a support aura this tick.
    pub speed_boost: bool,
}

impl Tower {
    /// Stats of the current tier.
    #[must_use]
    pub fn stats(&self) -> &'static TierStats {
        let def = self.kind.def();
        match self.tier {
            Tier::One => &def.t1,
            Tier::Two => &def.t2,
            Tier::Three(branch) => &def.t3[branch.min(2)],
        }
    }

    /// Cost of upgrading from the current tier, if possible.
    ///
    /// Tier 2 needs a `branch` choice; tier 3 is final.
    #[must_use]
    pub fn upgrade_cost(&self, branch: Option<usize>) -> Option<(Tier, u32)> {
        let def = self.kind.def();
        match (self.tier, branch) {
            (Tier::One, _) => Some((Tier::Two, def.t2.cost)),
            (Tier::Two, Some(b)) => def.t3.get(b).map(|stats| (Tier::Three(b), stats.cost)),
            (Tier::Two, None) | (Tier::Three(_), _) => None,
        }
    }

    /// Where the soldier in squad slot `slot` stands when idle.
    #[must_use]
    pub fn rally_position(&self, slot: usize) -> Vec2 {
        if let Some(rally) = self.rally_point {
            let (dx, dy) = match slot {
                0 => (0.0, -10.0),
                1 => (-15.0, 5.0),
                _ => (15.0, 5.0),
            };
            rally.offset(dx, dy)
        } else {
            let dx = (slot as f64 - 1.0) * 20.0;
            let dy = 30.0 + (slot % 2) as f64 * 10.0;
            self.pos.offset(dx, dy)
        }
    }

    /// Whether the attack or payout timer has run for `interval` ticks.
    #[must_use]
    pub fn is_ready(&self, now: u64, interval: u64) -> bool {
        self.last_attack
            .is_none_or(|last| now.saturating_sub(last) >= interval)
    }
}

/// An in-flight projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projectile {
    /// Table key.
    pub id: ProjectileId,
    /// Current position.
    pub pos: Vec2,
    /// Enemy being homed on.
    pub target: EnemyId,
    /// Last known target position; splash shots detonate here if the target
    /// vanishes.
    pub aim: Vec2,
    /// Units per tick.
    pub speed: f64,
    /// Damage on impact.
    pub damage: f64,
    /// Damage family.
    pub kind: ProjectileKind,
    /// Splash radius around the impact point.
    pub splash_radius: Option<f64>,
    /// Fired by the hero rather than a tower.
    pub from_hero: bool,
}

/// What a particle depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// Gold mine payout.
    Gold,
    /// Enemy death.
    Kill,
    /// Soldier strike.
    SoldierHit,
    /// Hero melee strike.
    HeroHit,
    /// Direct projectile hit.
    Impact,
    /// Splash detonation.
    Splash,
    /// Per-enemy skill flash.
    Skill,
    /// Hero move order marker.
    Waypoint,
}

/// A purely cosmetic, short-lived effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    /// What it depicts.
    pub kind: ParticleKind,
    /// Center.
    pub pos: Vec2,
    /// Remaining ticks.
    pub life: u32,
    /// Initial ticks.
    pub max_life: u32,
    /// Drawn radius.
    pub radius: f64,
}

impl Particle {
    /// Create a particle with full life.
    #[must_use]
    pub const fn new(kind: ParticleKind, pos: Vec2, life: u32, radius: f64) -> Self {
        Self {
            kind,
            pos,
            life,
            max_life: life,
            radius,
        }
    }
}

/// Visual tag of the hero skill currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillEffectKind {
    /// Rin's flame blast.
    RinBlast,
    /// Yuki's arrow rain.
    YukiRain,
    /// Sakura's laser.
    SakuraLaser,
    /// Tamamo's fog.
    TamamoFog,
    /// Ibaraki's giant hand.
    IbarakiHand,
}

/// Presentation record left behind by a skill activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillEffect {
    /// Which animation.
    pub kind: SkillEffectKind,
    /// Remaining ticks.
    pub timer: u32,
    /// Anchor point.
    pub pos: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(kind: TowerKind, tier: Tier) -> Tower {
        Tower {
            id: TowerId(1),
            kind,
            pos: Vec2::new(100.0, 100.0),
            tier,
            last_attack: None,
            level: 1,
            rally_point: None,
            soldiers: Vec::new(),
            speed_boost: false,
        }
    }

    #[test]
    fn test_upgrade_path_is_one_way() {
        let t1 = tower(TowerKind::Archer, Tier::One);
        assert_eq!(t1.upgrade_cost(None), Some((Tier::Two, 220)));

        let t2 = tower(TowerKind::Archer, Tier::Two);
        assert_eq!(t2.upgrade_cost(None), None);
        assert_eq!(t2.upgrade_cost(Some(1)), Some((Tier::Three(1), 380)));
        assert_eq!(t2.upgrade_cost(Some(3)), None);

        let t3 = tower(TowerKind::Archer, Tier::Three(0));
        assert_eq!(t3.upgrade_cost(Some(1)), None);
        assert_eq!(t3.upgrade_cost(None), None);
    }

    #[test]
    fn test_stats_follow_tier() {
        assert_eq!(tower(TowerKind::Mage, Tier::One).stats().cost, 120);
        assert_eq!(tower(TowerKind::Mage, Tier::Two).stats().cost, 260);
        assert_eq!(tower(TowerKind::Mage, Tier::Three(2)).stats().cost, 480);
    }

    #[test]
    fn test_default_rally_offsets() {
        let t = tower(TowerKind::Barracks, Tier::One);
        assert_eq!(t.rally_position(0), Vec2::new(80.0, 130.0));
        assert_eq!(t.rally_position(1), Vec2::new(100.0, 140.0));
        assert_eq!(t.rally_position(2), Vec2::new(120.0, 130.0));
    }

    #[test]
    fn test_custom_rally_offsets() {
        let mut t = tower(TowerKind::Barracks, Tier::One);
        t.rally_point = Some(Vec2::new(200.0, 200.0));
        assert_eq!(t.rally_position(0), Vec2::new(200.0, 190.0));
        assert_eq!(t.rally_position(1), Vec2::new(185.0, 205.0));
        assert_eq!(t.rally_position(2), Vec2::new(215.0, 205.0));
    }

    #[test]
    fn test_ready_timer() {
        let mut t = tower(TowerKind::Cannon, Tier::One);
        assert!(t.is_ready(0, 132));
        t.last_attack = Some(10);
        assert!(!t.is_ready(141, 132));
        assert!(t.is_ready(142, 132));
    }

    #[test]
    fn test_tier_branch_defaults_to_zero() {
        assert_eq!(Tier::One.branch(), 0);
        assert_eq!(Tier::Two.branch(), 0);
        assert_eq!(Tier::Three(2).branch(), 2);
        assert_eq!(Tier::Three(2).number(), 3);
    }
}

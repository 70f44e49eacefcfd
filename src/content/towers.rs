//! Tower roster: six kinds, each with tier 1, tier 2 and three tier-3 branches.

use serde::{Deserialize, Serialize};

/// Tower kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Trains three soldiers that block ground enemies.
    Barracks,
    /// Fast single-target arrows.
    Archer,
    /// Magic bolts that slow on hit.
    Mage,
    /// Splash bombs.
    Cannon,
    /// Periodic income, no attack.
    GoldMine,
    /// Aura structure buffing towers or debuffing enemies.
    Support,
}

/// Damage family of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Physical arrow.
    Arrow,
    /// Magic bolt; freezes briefly on a direct hit.
    Magic,
    /// Bomb; keeps flying to its last aim point if the target vanishes.
    Bomb,
}

/// Stats for one tier (or tier-3 branch) of a tower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierStats {
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Damage per shot (per soldier hit for barracks).
    pub damage: f64,
    /// Targeting or aura radius.
    pub range: f64,
    /// Milliseconds between attacks or payouts.
    pub rate_ms: u32,
    /// Purchase cost of this tier.
    pub cost: u32,
    /// Projectile fired, if any.
    pub projectile: Option<ProjectileKind>,
    /// Splash radius of fired projectiles.
    pub splash_radius: Option<f64>,
    /// Soldier hit points (barracks only).
    pub soldier_hp: Option<f64>,
    /// Soldier damage reduction (barracks only).
    pub soldier_armor: Option<f64>,
    /// Money per payout (gold mine only).
    pub income: u32,
}

impl TierStats {
    const fn base(name: &'static str, description: &'static str, cost: u32) -> Self {
        Self {
            name,
            description,
            damage: 0.0,
            range: 0.0,
            rate_ms: 0,
            cost,
            projectile: None,
            splash_radius: None,
            soldier_hp: None,
            soldier_armor: None,
            income: 0,
        }
    }

    const fn attack(mut self, damage: f64, range: f64, rate_ms: u32) -> Self {
        self.damage = damage;
        self.range = range;
        self.rate_ms = rate_ms;
        self
    }

    const fn shoots(mut self, kind: ProjectileKind) -> Self {
        self.projectile = Some(kind);
        self
    }

    const fn splash(mut self, radius: f64) -> Self {
        self.splash_radius = Some(radius);
        self
    }

    const fn soldiers(mut self, hp: f64, armor: f64) -> Self {
        self.soldier_hp = Some(hp);
        self.soldier_armor = Some(armor);
        self
    }

    const fn pays(mut self, rate_ms: u32, income: u32) -> Self {
        self.rate_ms = rate_ms;
        self.income = income;
        self
    }

    const fn aura(mut self, range: f64) -> Self {
        self.range = range;
        self
    }
}

/// Definition of one tower kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TowerDef {
    /// Kind this definition describes.
    pub kind: TowerKind,
    /// Display name.
    pub name: &'static str,
    /// Tier 1 stats (build).
    pub t1: TierStats,
    /// Tier 2 stats.
    pub t2: TierStats,
    /// Tier 3 branch options.
    pub t3: [TierStats; 3],
}

use ProjectileKind::{Arrow, Bomb, Magic};

/// Every tower kind, indexed by `TowerKind as usize`.
pub const TOWER_ROSTER: [TowerDef; 6] = [
    TowerDef {
        kind: TowerKind::Barracks,
        name: "Barracks",
        t1: TierStats::base("Militia Camp", "Trains three militia to hold the road.", 70)
            .attack(20.0, 200.0, 1000)
            .soldiers(200.0, 0.1),
        t2: TierStats::base("Infantry Barracks", "Better equipped, far sturdier soldiers.", 160)
            .attack(45.0, 220.0, 900)
            .soldiers(450.0, 0.4),
        t3: [
            TierStats::base("Paladin Hall", "Heavily armored paladins, very hard to kill.", 250)
                .attack(100.0, 250.0, 800)
                .soldiers(1000.0, 0.8),
            TierStats::base("Barbarian Crossing", "Dual-axe berserkers with huge damage.", 230)
                .attack(160.0, 240.0, 600)
                .soldiers(600.0, 0.2),
            TierStats::base("Assassin Guild", "Evasive assassins with lethal strikes.", 240)
                .attack(120.0, 260.0, 500)
                .soldiers(500.0, 0.3),
        ],
    },
    TowerDef {
        kind: TowerKind::Archer,
        name: "Archer Tower",
        t1: TierStats::base("Watchtower", "Fires arrows at a moderate pace.", 100)
            .attack(35.0, 140.0, 900)
            .shoots(Arrow),
        t2: TierStats::base("Hunter Lodge", "Longer reach and harder hits.", 220)
            .attack(80.0, 180.0, 800)
            .shoots(Arrow),
        t3: [
            TierStats::base("Musketeer Post", "Extreme range, devastating single shots.", 400)
                .attack(600.0, 350.0, 2000)
                .shoots(Arrow),
            TierStats::base("Elven Rangers", "A storm of rapid arrows.", 380)
                .attack(60.0, 220.0, 150)
                .shoots(Arrow),
            TierStats::base("Venom Vines", "Arrows laced with potent toxin.", 350)
                .attack(100.0, 170.0, 700)
                .shoots(Magic),
        ],
    },
    TowerDef {
        kind: TowerKind::Mage,
        name: "Mage Tower",
        t1: TierStats::base("Mage Tower", "Magic bolts that ignore armor.", 120)
            .attack(70.0, 130.0, 1400)
            .shoots(Magic),
        t2: TierStats::base("Arcane Spire", "Powerful armor-breaking magic.", 260)
            .attack(150.0, 160.0, 1300)
            .shoots(Magic),
        t3: [
            TierStats::base("Arcane Wizard", "Disintegration rays melt enemies.", 500)
                .attack(400.0, 200.0, 1800)
                .shoots(Magic),
            TierStats::base("Necromancer", "Rapid shadow bolts that curse.", 450)
                .attack(140.0, 170.0, 1000)
                .shoots(Magic),
            TierStats::base("Elemental Summoner", "Earth elementals pound the ground.", 480)
                .attack(200.0, 160.0, 900)
                .shoots(Magic),
        ],
    },
    TowerDef {
        kind: TowerKind::Cannon,
        name: "Cannon",
        t1: TierStats::base("Dwarven Cannon", "Explosive area damage.", 140)
            .attack(80.0, 120.0, 2200)
            .shoots(Bomb)
            .splash(70.0),
        t2: TierStats::base("Heavy Howitzer", "Bigger blasts, more damage.", 300)
            .attack(180.0, 150.0, 2000)
            .shoots(Bomb)
            .splash(100.0),
        t3: [
            TierStats::base("Tesla Coil", "Chain lightning across a crowd.", 550)
                .attack(250.0, 170.0, 1500)
                .shoots(Magic)
                .splash(120.0),
            TierStats::base("Big Bertha", "Map-spanning artillery strikes.", 600)
                .attack(1000.0, 350.0, 3200)
                .shoots(Bomb)
                .splash(180.0),
            TierStats::base("Battle Mech", "A barrage of micro missiles.", 580)
                .attack(130.0, 120.0, 600)
                .shoots(Bomb)
                .splash(60.0),
        ],
    },
    TowerDef {
        kind: TowerKind::GoldMine,
        name: "Gold Mine",
        t1: TierStats::base("Mining Camp", "Produces gold periodically.", 200).pays(4000, 15),
        t2: TierStats::base("Deep Mine", "Increased gold output.", 350).pays(3500, 35),
        t3: [
            TierStats::base("Dwarven Bank", "Highly efficient gold output.", 600).pays(2500, 50),
            TierStats::base("Black Market", "Gold with a shady edge.", 500).pays(3000, 50),
            TierStats::base("Gem Workshop", "Gold and polished gems.", 550).pays(3000, 50),
        ],
    },
    TowerDef {
        kind: TowerKind::Support,
        name: "Totem",
        t1: TierStats::base("Tribal Totem", "Quickens nearby towers.", 150).aura(100.0),
        t2: TierStats::base("War Drums", "Quickens towers over a wider area.", 300).aura(140.0),
        t3: [
            TierStats::base("Bloodlust Totem", "Greatly raises nearby attack speed.", 500)
                .aura(180.0),
            TierStats::base("Dread Totem", "Terrified enemies nearby slow down.", 550)
                .aura(180.0),
            TierStats::base("Soul Link", "Mends soldiers of nearby barracks.", 600).aura(180.0),
        ],
    },
];

impl TowerKind {
    /// All kinds in roster order.
    pub const ALL: [TowerKind; 6] = [
        TowerKind::Barracks,
        TowerKind::Archer,
        TowerKind::Mage,
        TowerKind::Cannon,
        TowerKind::GoldMine,
        TowerKind::Support,
    ];

    /// Static definition for this kind.
    #[must_use]
    pub const fn def(self) -> &'static TowerDef {
        &TOWER_ROSTER[self as usize]
    }

    /// Attack towers fire projectiles on their own rate timer.
    #[must_use]
    pub const fn is_attack(self) -> bool {
        matches!(self, TowerKind::Archer | TowerKind::Mage | TowerKind::Cannon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_index_matches_kind() {
        for (index, def) in TOWER_ROSTER.iter().enumerate() {
            assert_eq!(def.kind as usize, index);
            assert_eq!(TowerKind::ALL[index], def.kind);
        }
    }

    #[test]
    fn test_barracks_tiers_carry_soldier_stats() {
        let def = TowerKind::Barracks.def();
        assert_eq!(def.t1.soldier_hp, Some(200.0));
        assert_eq!(def.t2.soldier_armor, Some(0.4));
        for branch in &def.t3 {
            assert!(branch.soldier_hp.is_some());
        }
    }

    #[test]
    fn test_cannon_splash_radii() {
        let def = TowerKind::Cannon.def();
        assert_eq!(def.t1.splash_radius, Some(70.0));
        assert_eq!(def.t3[1].splash_radius, Some(180.0));
        assert_eq!(def.t3[0].projectile, Some(ProjectileKind::Magic));
    }

    #[test]
    fn test_gold_mine_income_by_tier() {
        let def = TowerKind::GoldMine.def();
        assert_eq!(def.t1.income, 15);
        assert_eq!(def.t2.income, 35);
        assert!(def.t3.iter().all(|b| b.income == 50));
        assert!(def.t1.projectile.is_none());
    }

    #[test]
    fn test_only_attack_towers_shoot() {
        for def in &TOWER_ROSTER {
            assert_eq!(def.t1.projectile.is_some(), def.kind.is_attack());
        }
    }
}

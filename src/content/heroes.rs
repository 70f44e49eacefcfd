//! Hero roster and talent trees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Stable hero identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroId {
    /// Oni swordswoman, melee tank.
    Rin,
    /// Archer scout.
    Yuki,
    /// Gunner and sniper.
    Sakura,
    /// Fox mage, crowd control.
    Tamamo,
    /// Gauntlet bruiser.
    Ibaraki,
}

/// Weapon family; decides melee vs ranged behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Melee blade.
    Sword,
    /// Ranged, fires arrows.
    Bow,
    /// Ranged, fires shells.
    Gun,
    /// Ranged, fires magic bolts.
    Magic,
    /// Melee fists.
    Gauntlet,
}

impl WeaponKind {
    /// Ranged heroes fire projectiles instead of brawling.
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, WeaponKind::Bow | WeaponKind::Gun | WeaponKind::Magic)
    }

    /// Interval between ranged shots in milliseconds.
    #[must_use]
    pub const fn attack_interval_ms(self) -> u32 {
        match self {
            WeaponKind::Gun => 600,
            WeaponKind::Magic => 1000,
            WeaponKind::Sword | WeaponKind::Bow | WeaponKind::Gauntlet => 800,
        }
    }
}

/// Every talent in every tree.
///
/// Serialized ids are the snake-case names, e.g. `rin_t1_hp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum TalentId {
    RinT1Hp,
    RinT1Atk,
    RinT2Burn,
    RinT2Thorns,
    RinT3Ult,
    YukiT1Spd,
    YukiT1Range,
    YukiT2Crit,
    YukiT2Pierce,
    YukiT3Ult,
    SakuraT1Reload,
    SakuraT1Dmg,
    SakuraT2Headshot,
    SakuraT2Splash,
    SakuraT3Ult,
    TamamoT1Mp,
    TamamoT1Ap,
    TamamoT2Slow,
    TamamoT2Charm,
    TamamoT3Ult,
    IbarakiT1Armor,
    IbarakiT1Hp,
    IbarakiT2Cleave,
    IbarakiT2Lifesteal,
    IbarakiT3Ult,
}

impl TalentId {
    /// All talents, grouped by hero and tier.
    pub const ALL: [TalentId; 25] = [
        TalentId::RinT1Hp,
        TalentId::RinT1Atk,
        TalentId::RinT2Burn,
        TalentId::RinT2Thorns,
        TalentId::RinT3Ult,
        TalentId::YukiT1Spd,
        TalentId::YukiT1Range,
        TalentId::YukiT2Crit,
        TalentId::YukiT2Pierce,
        TalentId::YukiT3Ult,
        TalentId::SakuraT1Reload,
        TalentId::SakuraT1Dmg,
        TalentId::SakuraT2Headshot,
        TalentId::SakuraT2Splash,
        TalentId::SakuraT3Ult,
        TalentId::TamamoT1Mp,
        TalentId::TamamoT1Ap,
        TalentId::TamamoT2Slow,
        TalentId::TamamoT2Charm,
        TalentId::TamamoT3Ult,
        TalentId::IbarakiT1Armor,
        TalentId::IbarakiT1Hp,
        TalentId::IbarakiT2Cleave,
        TalentId::IbarakiT2Lifesteal,
        TalentId::IbarakiT3Ult,
    ];

    /// Stable identifier string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TalentId::RinT1Hp => "rin_t1_hp",
            TalentId::RinT1Atk => "rin_t1_atk",
            TalentId::RinT2Burn => "rin_t2_burn",
            TalentId::RinT2Thorns => "rin_t2_thorns",
            TalentId::RinT3Ult => "rin_t3_ult",
            TalentId::YukiT1Spd => "yuki_t1_spd",
            TalentId::YukiT1Range => "yuki_t1_range",
            TalentId::YukiT2Crit => "yuki_t2_crit",
            TalentId::YukiT2Pierce => "yuki_t2_pierce",
            TalentId::YukiT3Ult => "yuki_t3_ult",
            TalentId::SakuraT1Reload => "sakura_t1_reload",
            TalentId::SakuraT1Dmg => "sakura_t1_dmg",
            TalentId::SakuraT2Headshot => "sakura_t2_headshot",
            TalentId::SakuraT2Splash => "sakura_t2_splash",
            TalentId::SakuraT3Ult => "sakura_t3_ult",
            TalentId::TamamoT1Mp => "tamamo_t1_mp",
            TalentId::TamamoT1Ap => "tamamo_t1_ap",
            TalentId::TamamoT2Slow => "tamamo_t2_slow",
            TalentId::TamamoT2Charm => "tamamo_t2_charm",
            TalentId::TamamoT3Ult => "tamamo_t3_ult",
            TalentId::IbarakiT1Armor => "ibaraki_t1_armor",
            TalentId::IbarakiT1Hp => "ibaraki_t1_hp",
            TalentId::IbarakiT2Cleave => "ibaraki_t2_cleave",
            TalentId::IbarakiT2Lifesteal => "ibaraki_t2_lifesteal",
            TalentId::IbarakiT3Ult => "ibaraki_t3_ult",
        }
    }

    /// Hero whose tree contains this talent.
    #[must_use]
    pub const fn hero(self) -> HeroId {
        match self as usize / 5 {
            0 => HeroId::Rin,
            1 => HeroId::Yuki,
            2 => HeroId::Sakura,
            3 => HeroId::Tamamo,
            _ => HeroId::Ibaraki,
        }
    }

    /// Tier (1..=3) this talent is picked at.
    #[must_use]
    pub const fn tier(self) -> u8 {
        match self as usize % 5 {
            0 | 1 => 1,
            2 | 3 => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for TalentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TalentId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TalentId::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownTalent(s.to_string()))
    }
}

/// The three talents chosen before a match, one per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TalentSelection {
    /// Tier 1 pick.
    pub t1: Option<TalentId>,
    /// Tier 2 pick.
    pub t2: Option<TalentId>,
    /// Tier 3 pick.
    pub t3: Option<TalentId>,
}

impl TalentSelection {
    /// Build a selection from any number of talents, slotting each by its
    /// own tier. Later talents of the same tier replace earlier ones.
    #[must_use]
    pub fn from_talents(talents: &[TalentId]) -> Self {
        let mut selection = Self::default();
        for &talent in talents {
            match talent.tier() {
                1 => selection.t1 = Some(talent),
                2 => selection.t2 = Some(talent),
                _ => selection.t3 = Some(talent),
            }
        }
        selection
    }

    /// Whether `talent` is selected in any tier.
    #[must_use]
    pub fn has(self, talent: TalentId) -> bool {
        self.t1 == Some(talent) || self.t2 == Some(talent) || self.t3 == Some(talent)
    }

    /// The selected talents tagged with the tier slot they occupy.
    pub fn slots(self) -> impl Iterator<Item = (u8, TalentId)> {
        [(1, self.t1), (2, self.t2), (3, self.t3)]
            .into_iter()
            .filter_map(|(tier, talent)| talent.map(|t| (tier, t)))
    }

    /// Check every pick belongs to `hero` and sits in its own tier.
    ///
    /// # Errors
    ///
    /// Returns the first misplaced or foreign talent.
    pub fn validate(self, hero: HeroId) -> Result<(), ConfigError> {
        for (tier, talent) in self.slots() {
            if talent.hero() != hero {
                return Err(ConfigError::TalentNotInTree { hero, talent });
            }
            if talent.tier() != tier {
                return Err(ConfigError::TalentTierMismatch { tier, talent });
            }
        }
        Ok(())
    }
}

/// Definition of one hero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeroDef {
    /// Stable identifier.
    pub id: HeroId,
    /// Display name.
    pub name: &'static str,
    /// Short role blurb.
    pub role: &'static str,
    /// Base hit points.
    pub hp: f64,
    /// Base attack damage.
    pub attack: f64,
    /// Damage reduction fraction against enemy hits.
    pub armor: f64,
    /// Seconds dead before respawning.
    pub respawn_secs: f64,
    /// Seconds between skill activations.
    pub skill_cooldown_secs: f64,
    /// Weapon family.
    pub weapon: WeaponKind,
    /// Skill name, for presentation.
    pub ultimate: &'static str,
    /// Talent options per tier.
    pub talents: [&'static [TalentId]; 3],
}

/// Every hero, indexed by `HeroId as usize`.
pub const HERO_ROSTER: [HeroDef; 5] = [
    HeroDef {
        id: HeroId::Rin,
        name: "Rin the Red Oni",
        role: "Oni samurai / tank",
        hp: 700.0,
        attack: 40.0,
        armor: 0.5,
        respawn_secs: 15.0,
        skill_cooldown_secs: 25.0,
        weapon: WeaponKind::Sword,
        ultimate: "Oni Flame Slash",
        talents: [
            &[TalentId::RinT1Hp, TalentId::RinT1Atk],
            &[TalentId::RinT2Burn, TalentId::RinT2Thorns],
            &[TalentId::RinT3Ult],
        ],
    },
    HeroDef {
        id: HeroId::Yuki,
        name: "Yuki of the Snow",
        role: "Archer / scout",
        hp: 400.0,
        attack: 65.0,
        armor: 0.1,
        respawn_secs: 12.0,
        skill_cooldown_secs: 30.0,
        weapon: WeaponKind::Bow,
        ultimate: "Frost Arrow Rain",
        talents: [
            &[TalentId::YukiT1Spd, TalentId::YukiT1Range],
            &[TalentId::YukiT2Crit, TalentId::YukiT2Pierce],
            &[TalentId::YukiT3Ult],
        ],
    },
    HeroDef {
        id: HeroId::Sakura,
        name: "Sakura the Gunner",
        role: "Sniper / assassin",
        hp: 450.0,
        attack: 55.0,
        armor: 0.2,
        respawn_secs: 14.0,
        skill_cooldown_secs: 40.0,
        weapon: WeaponKind::Gun,
        ultimate: "Orbital Laser",
        talents: [
            &[TalentId::SakuraT1Reload, TalentId::SakuraT1Dmg],
            &[TalentId::SakuraT2Headshot, TalentId::SakuraT2Splash],
            &[TalentId::SakuraT3Ult],
        ],
    },
    HeroDef {
        id: HeroId::Tamamo,
        name: "Tamamo the Fox",
        role: "Control mage",
        hp: 300.0,
        attack: 75.0,
        armor: 0.0,
        respawn_secs: 16.0,
        skill_cooldown_secs: 35.0,
        weapon: WeaponKind::Magic,
        ultimate: "Nine-Tail Miasma",
        talents: [
            &[TalentId::TamamoT1Mp, TalentId::TamamoT1Ap],
            &[TalentId::TamamoT2Slow, TalentId::TamamoT2Charm],
            &[TalentId::TamamoT3Ult],
        ],
    },
    HeroDef {
        id: HeroId::Ibaraki,
        name: "Ibaraki the Brawler",
        role: "Bruiser / summoner",
        hp: 650.0,
        attack: 50.0,
        armor: 0.4,
        respawn_secs: 18.0,
        skill_cooldown_secs: 28.0,
        weapon: WeaponKind::Gauntlet,
        ultimate: "Hand of the Abyss",
        talents: [
            &[TalentId::IbarakiT1Armor, TalentId::IbarakiT1Hp],
            &[TalentId::IbarakiT2Cleave, TalentId::IbarakiT2Lifesteal],
            &[TalentId::IbarakiT3Ult],
        ],
    },
];

impl HeroId {
    /// All heroes in roster order.
    pub const ALL: [HeroId; 5] = [
        HeroId::Rin,
        HeroId::Yuki,
        HeroId::Sakura,
        HeroId::Tamamo,
        HeroId::Ibaraki,
    ];

    /// Static definition for this hero.
    #[must_use]
    pub const fn def(self) -> &'static HeroDef {
        &HERO_ROSTER[self as usize]
    }

    /// Stable identifier string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HeroId::Rin => "rin",
            HeroId::Yuki => "yuki",
            HeroId::Sakura => "sakura",
            HeroId::Tamamo => "tamamo",
            HeroId::Ibaraki => "ibaraki",
        }
    }
}

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeroId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("h_").unwrap_or(s);
        HeroId::ALL
            .iter()
            .copied()
            .find(|h| h.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownHero(s.to_string()))
    }
}

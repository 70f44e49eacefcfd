//! Enemy roster.

use serde::{Deserialize, Serialize};

/// Enemy kinds in roster order.
///
/// The order matters: the wave director draws kinds by index into
/// [`ENEMY_ROSTER`], unlocking later entries as waves progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Weak, slow blob.
    Slime,
    /// Fast skirmisher.
    Goblin,
    /// Very fast pack hunter.
    Wolf,
    /// Sturdy infantry.
    Orc,
    /// Flying raider, cannot be blocked.
    Harpy,
    /// Heavily armored knight.
    ArmoredKnight,
    /// Caster with moderate hp.
    DarkMage,
    /// Huge, slow, very durable.
    Golem,
    /// Fast, durable elite.
    Demon,
    /// Flying boss.
    VoidLord,
}

/// Definition of one enemy kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyDef {
    /// Kind this definition describes.
    pub kind: EnemyKind,
    /// Display name.
    pub name: &'static str,
    /// Hit points at wave 1.
    pub base_hp: f64,
    /// Movement in units per tick.
    pub speed: f64,
    /// Armor rating (informational).
    pub armor: f64,
    /// Flying enemies ignore ground blocking.
    pub flying: bool,
    /// Money (and score) credited on kill.
    pub reward: u32,
}

const fn enemy(
    kind: EnemyKind,
    name: &'static str,
    base_hp: f64,
    speed: f64,
    armor: f64,
    flying: bool,
    reward: u32,
) -> EnemyDef {
    EnemyDef {
        kind,
        name,
        base_hp,
        speed,
        armor,
        flying,
        reward,
    }
}

/// Every enemy kind, indexed by `EnemyKind as usize`.
pub const ENEMY_ROSTER: [EnemyDef; 10] = [
    enemy(EnemyKind::Slime, "Slime", 30.0, 1.0, 0.0, false, 5),
    enemy(EnemyKind::Goblin, "Goblin", 45.0, 1.8, 0.1, false, 8),
    enemy(EnemyKind::Wolf, "Dire Wolf", 70.0, 2.2, 0.0, false, 12),
    enemy(EnemyKind::Orc, "Orc Warrior", 180.0, 0.8, 0.3, false, 20),
    enemy(EnemyKind::Harpy, "Harpy", 100.0, 1.5, 0.0, true, 15),
    enemy(EnemyKind::ArmoredKnight, "Dark Knight", 300.0, 0.7, 0.7, false, 35),
    enemy(EnemyKind::DarkMage, "Dark Priest", 160.0, 1.0, 0.2, false, 30),
    enemy(EnemyKind::Golem, "Golem", 800.0, 0.4, 0.5, false, 60),
    enemy(EnemyKind::Demon, "Demon", 600.0, 1.2, 0.3, false, 50),
    enemy(EnemyKind::VoidLord, "Void Lord", 3500.0, 0.5, 0.6, true, 500),
];

impl EnemyKind {
    /// The boss kind substituted on every fifth wave.
    pub const BOSS: Self = Self::VoidLord;

    /// Static definition for this kind.
    #[must_use]
    pub const fn def(self) -> &'static EnemyDef {
        &ENEMY_ROSTER[self as usize]
    }

    /// Kind at a roster index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        ENEMY_ROSTER.get(index).map(|def| def.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order_matches_kind_index() {
        for (index, def) in ENEMY_ROSTER.iter().enumerate() {
            assert_eq!(def.kind as usize, index);
            assert_eq!(EnemyKind::from_index(index), Some(def.kind));
        }
        assert_eq!(EnemyKind::from_index(10), None);
    }

    #[test]
    fn test_boss_is_last_and_flying() {
        assert_eq!(EnemyKind::BOSS as usize, ENEMY_ROSTER.len() - 1);
        assert!(EnemyKind::BOSS.def().flying);
        assert_eq!(EnemyKind::BOSS.def().reward, 500);
    }
}

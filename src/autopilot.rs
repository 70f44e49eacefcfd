//! Scripted players.
//!
//! A [`Strategy`] looks at the presentation snapshot, exactly like a human
//! player would, and answers with commands. Strategies are deterministic so
//! headless matches stay reproducible for a given seed.

use serde::{Deserialize, Serialize};

use crate::content::{TowerKind, level};
use crate::game::{Command, Snapshot, Tier, Tower};

/// Decides what to do before each tick.
pub trait Strategy {
    /// Short name for reports.
    fn name(&self) -> &'static str;

    /// Commands to submit before the next tick.
    fn decide(&mut self, view: &Snapshot<'_>) -> Vec<Command>;
}

/// Built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Never does anything.
    Idle,
    /// Builds, upgrades and fights whenever it can.
    #[default]
    Greedy,
}

impl StrategyKind {
    /// Create a fresh player of this kind.
    #[must_use]
    pub fn create(self) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::Idle => Box::new(Idle),
            StrategyKind::Greedy => Box::new(Greedy::default()),
        }
    }
}

/// A player that never acts; every enemy walks through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Strategy for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn decide(&mut self, _view: &Snapshot<'_>) -> Vec<Command> {
        Vec::new()
    }
}

/// Rotation of tower kinds built on free slots.
const BUILD_ORDER: [TowerKind; 6] = [
    TowerKind::Archer,
    TowerKind::Barracks,
    TowerKind::Cannon,
    TowerKind::Mage,
    TowerKind::Archer,
    TowerKind::Support,
];

/// Enemies on the field before the hero skill is worth spending.
const SKILL_CROWD: usize = 3;
/// The hero walks over when farther than this from its quarry.
const HERO_CHASE_DISTANCE: f64 = 40.0;

/// Spends every coin as soon as possible.
///
/// Every `think_every` ticks it fires the skill into crowds, sends the hero
/// after the leading ground enemy, calls the next wave on an empty field and
/// makes at most one purchase: a tower on the first free slot, or else the
/// cheapest available upgrade.
#[derive(Debug, Clone, Copy)]
pub struct Greedy {
    think_every: u64,
    builds: usize,
}

impl Default for Greedy {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Greedy {
    /// Greedy player thinking every `think_every` ticks.
    #[must_use]
    pub fn new(think_every: u64) -> Self {
        Self {
            think_every: think_every.max(1),
            builds: 0,
        }
    }

    fn purchase(&mut self, view: &Snapshot<'_>) -> Option<Command> {
        let level = level(view.level)?;
        let free_slot = level
            .build_slots
            .iter()
            .copied()
            .find(|slot| !view.towers.iter().any(|t| t.pos.distance(*slot) < 1.0));

        if let Some(slot) = free_slot {
            let kind = BUILD_ORDER[self.builds % BUILD_ORDER.len()];
            if view.money < f64::from(kind.def().t1.cost) {
                return None;
            }
            self.builds += 1;
            return Some(Command::Build { kind, slot });
        }

        let (tower, branch, cost) = view
            .towers
            .iter()
            .filter_map(|tower| {
                let branch = preferred_branch(tower);
                tower
                    .upgrade_cost(branch)
                    .map(|(_, cost)| (tower.id, branch, cost))
            })
            .min_by_key(|&(_, _, cost)| cost)?;
        (view.money >= f64::from(cost)).then_some(Command::Upgrade { tower, branch })
    }
}

/// Branch picked when a tower reaches tier 3; spread by tower id.
fn preferred_branch(tower: &Tower) -> Option<usize> {
    match tower.tier {
        Tier::Two => Some(usize::try_from(tower.id.0 % 3).unwrap_or(0)),
        Tier::One | Tier::Three(_) => None,
    }
}

impl Strategy for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn decide(&mut self, view: &Snapshot<'_>) -> Vec<Command> {
        let mut commands = Vec::new();
        if view.outcome.is_terminal() || view.tick % self.think_every != 0 {
            return commands;
        }

        let alive = view.enemies.iter().filter(|e| e.is_alive()).count();
        if alive >= SKILL_CROWD && view.hero.skill_ready() {
            commands.push(Command::ActivateSkill);
        }

        let hero = view.hero;
        if !hero.dead && hero.fighting.is_none() {
            let leader = view
                .enemies
                .iter()
                .filter(|e| e.is_alive() && !e.flying)
                .max_by_key(|e| e.path_index)
                .map(|e| e.pos);
            if let Some(to) = leader.filter(|pos| pos.distance(hero.pos) > HERO_CHASE_DISTANCE) {
                commands.push(Command::MoveHero { to });
            }
        }

        if alive == 0 {
            commands.push(Command::CallNextWave);
        }
        if let Some(purchase) = self.purchase(view) {
            commands.push(purchase);
        }
        commands
    }
}

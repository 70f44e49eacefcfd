//! Match invariants: sanity checks that detect simulation bugs.
//!
//! None of these should ever trigger for a state produced by
//! [`run_tick`](crate::game::run_tick) and
//! [`apply_command`](crate::game::apply_command). They are bug detectors,
//! not gameplay limits.

use crate::content::TowerKind;
use crate::game::command::SQUAD_SIZE;
use crate::game::{Blocker, HeroState, MatchState, Tier};

/// Slack allowed on hit point caps for accumulated float error.
const HP_EPSILON: f64 = 1e-6;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all match invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &MatchState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });
    check_economy(state, &mut fail);
    check_enemies(state, &mut fail);
    check_towers(state, &mut fail);
    check_hero(state, &mut fail);
    violations
}

fn check_economy(state: &MatchState, fail: &mut impl FnMut(String)) {
    if state.lives > state.starting_lives {
        fail(format!(
            "lives {} exceed starting lives {}",
            state.lives, state.starting_lives
        ));
    }
    if !state.money.is_finite() || state.money < 0.0 {
        fail(format!("money {} is negative or not finite", state.money));
    }
    if state.lives == 0 && !state.is_terminal() && state.tick > 0 {
        fail("lives reached zero without ending the match".to_string());
    }
}

fn check_enemies(state: &MatchState, fail: &mut impl FnMut(String)) {
    for (id, enemy) in &state.enemies {
        if *id != enemy.id {
            fail(format!("enemy {} stored under key {}", enemy.id, id));
        }
        let Some(path) = state.level.paths.get(enemy.path) else {
            fail(format!("enemy {} walks missing path {}", id, enemy.path));
            continue;
        };
        if enemy.path_index >= path.len() {
            fail(format!(
                "enemy {} path index {} past path of {} points",
                id,
                enemy.path_index,
                path.len()
            ));
        }
        if enemy.hp > enemy.max_hp + HP_EPSILON {
            fail(format!("enemy {} hp {} above max {}", id, enemy.hp, enemy.max_hp));
        }
        match enemy.blocked_by {
            Some(_) if enemy.flying => fail(format!("flying enemy {id} is blocked")),
            Some(Blocker::Hero) if state.hero.fighting != Some(*id) => {
                fail(format!("enemy {id} blocked by a hero fighting someone else"));
            }
            Some(Blocker::Soldier(soldier)) => {
                let holder = state
                    .towers
                    .values()
                    .flat_map(|t| &t.soldiers)
                    .find(|s| s.id == soldier);
                match holder {
                    None => fail(format!("enemy {id} blocked by missing soldier {soldier}")),
                    Some(s) if s.dead => {
                        fail(format!("enemy {id} blocked by dead soldier {soldier}"));
                    }
                    Some(_) => {}
                }
            }
            _ => {}
        }
    }
}

fn check_towers(state: &MatchState, fail: &mut impl FnMut(String)) {
    for (id, tower) in &state.towers {
        if let Tier::Three(branch) = tower.tier {
            if branch >= 3 {
                fail(format!("tower {id} on tier-3 branch {branch}"));
            }
        }
        let expected = if tower.kind == TowerKind::Barracks {
            SQUAD_SIZE
        } else {
            0
        };
        if tower.soldiers.len() != expected {
            fail(format!(
                "{:?} tower {} has {} soldiers, expected {}",
                tower.kind,
                id,
                tower.soldiers.len(),
                expected
            ));
        }
        for soldier in &tower.soldiers {
            if soldier.hp > soldier.max_hp + HP_EPSILON {
                fail(format!(
                    "soldier {} hp {} above max {}",
                    soldier.id, soldier.hp, soldier.max_hp
                ));
            }
        }
    }
}

fn check_hero(state: &MatchState, fail: &mut impl FnMut(String)) {
    let hero = &state.hero;
    if hero.hp > hero.stats.max_hp + HP_EPSILON {
        fail(format!("hero hp {} above max {}", hero.hp, hero.stats.max_hp));
    }
    if (hero.state == HeroState::Fighting) != hero.fighting.is_some() {
        fail(format!(
            "hero in state {:?} with fighting target {:?}",
            hero.state, hero.fighting
        ));
    }
    if hero.dead && hero.fighting.is_some() {
        fail("dead hero still engaged".to_string());
    }
}

/// Assert all match invariants hold.
///
/// Only active in debug builds.
///
/// # Panics
///
/// Panics listing every violation found.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &MatchState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!(
            "match invariant violations at tick {}:\n  - {}",
            state.tick,
            messages.join("\n  - ")
        );
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &MatchState) {}

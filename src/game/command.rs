//! Player commands.
//!
//! Commands are validated against the current state and silently rejected
//! when they do not apply; a rejection never changes anything.

use std::time::Duration;

use rand::Rng;

use crate::content::TowerKind;
use crate::game::economy::try_spend;
use crate::game::{
    Blocker, HeroState, MatchState, Particle, ParticleKind, Soldier, Tier, Tower, TowerId,
    WaveDirector, skill,
};
use crate::geom::Vec2;

/// How far a build request may be from the slot it names.
pub const SLOT_TOLERANCE: f64 = 1.0;
/// Soldiers trained by one barracks.
pub const SQUAD_SIZE: usize = 3;

/// Everything a player can ask of the match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Build a tier-1 tower on a free build slot.
    Build {
        /// Tower kind.
        kind: TowerKind,
        /// Build slot coordinate.
        slot: Vec2,
    },
    /// Upgrade a tower one tier; tier 2 to 3 needs a branch.
    Upgrade {
        /// Tower to upgrade.
        tower: TowerId,
        /// Tier-3 branch (0..3).
        branch: Option<usize>,
    },
    /// Sell a tower for the flat refund.
    Sell {
        /// Tower to sell.
        tower: TowerId,
    },
    /// Move a barracks' rally point within its range.
    SetRallyPoint {
        /// Barracks tower.
        tower: TowerId,
        /// New rally point.
        point: Vec2,
    },
    /// Walk the hero to a point.
    MoveHero {
        /// Destination.
        to: Vec2,
    },
    /// Fire the hero's skill.
    ActivateSkill,
    /// Start the next wave as soon as the field is clear.
    CallNextWave,
    /// Pause or resume.
    SetPaused(bool),
    /// Highlight a tower in the UI, or clear the highlight.
    SelectTower(Option<TowerId>),
}

type Outcome = Result<(), &'static str>;

/// Apply a command. Returns whether it was accepted.
///
/// `now` is the session's real-time clock reading, used only by the
/// rate-limited wave call. Once the match has ended only pause and
/// selection commands are accepted.
pub fn apply_command(
    state: &mut MatchState,
    director: &mut WaveDirector,
    command: Command,
    now: Duration,
) -> bool {
    let outcome = match command {
        Command::SetPaused(paused) => {
            state.paused = paused;
            Ok(())
        }
        Command::SelectTower(tower) => select(state, tower),
        _ if state.is_terminal() => Err("match is over"),
        Command::Build { kind, slot } => build(state, kind, slot),
        Command::Upgrade { tower, branch } => upgrade(state, tower, branch),
        Command::Sell { tower } => sell(state, tower),
        Command::SetRallyPoint { tower, point } => set_rally_point(state, tower, point),
        Command::MoveHero { to } => move_hero(state, to),
        Command::ActivateSkill => {
            if skill::activate(state) {
                Ok(())
            } else {
                Err("skill not ready")
            }
        }
        Command::CallNextWave => {
            if director.call_next_wave(now) {
                Ok(())
            } else {
                Err("wave call is rate limited")
            }
        }
    };

    match outcome {
        Ok(()) => {
            tracing::trace!(target: "skyguard::command", ?command, tick = state.tick, "applied");
            true
        }
        Err(reason) => {
            tracing::debug!(target: "skyguard::command", ?command, reason, "rejected");
            false
        }
    }
}

fn select(state: &mut MatchState, tower: Option<TowerId>) -> Outcome {
    if tower.is_some_and(|id| !state.towers.contains_key(&id)) {
        return Err("unknown tower");
    }
    state.selected_tower = tower;
    Ok(())
}

fn build(state: &mut MatchState, kind: TowerKind, pos: Vec2) -> Outcome {
    let slot = state
        .level
        .slot_at(pos, SLOT_TOLERANCE)
        .ok_or("not a build slot")?;
    if state.tower_at(slot).is_some() {
        return Err("slot occupied");
    }
    let stats = &kind.def().t1;
    if !try_spend(state, stats.cost) {
        return Err("insufficient funds");
    }

    let id = state.ids.tower();
    let mut tower = Tower {
        id,
        kind,
        pos: slot,
        tier: Tier::One,
        last_attack: None,
        level: 1,
        rally_point: None,
        soldiers: Vec::new(),
        speed_boost: false,
    };
    if kind == TowerKind::Barracks {
        let hp = stats.soldier_hp.unwrap_or(100.0);
        for index in 0..SQUAD_SIZE {
            let jitter = state.rng.gen_range(-10.0..10.0);
            tower.soldiers.push(Soldier {
                id: state.ids.soldier(),
                slot: index,
                pos: slot.offset(jitter, 30.0),
                hp,
                max_hp: hp,
                damage: stats.damage,
                dead: false,
                respawn_timer: 0,
                target: None,
            });
        }
    }
    state.towers.insert(id, tower);
    Ok(())
}

fn upgrade(state: &mut MatchState, id: TowerId, branch: Option<usize>) -> Outcome {
    let tower = state.towers.get(&id).ok_or("unknown tower")?;
    let (tier, cost) = tower.upgrade_cost(branch).ok_or("no such upgrade")?;
    if !try_spend(state, cost) {
        return Err("insufficient funds");
    }

    let tower = state.towers.get_mut(&id).ok_or("unknown tower")?;
    tower.tier = tier;
    tower.level += 1;
    let stats = tower.stats();
    for soldier in &mut tower.soldiers {
        soldier.max_hp = stats.soldier_hp.unwrap_or(soldier.max_hp);
        soldier.hp = soldier.hp.min(soldier.max_hp);
        soldier.damage = stats.damage;
    }
    Ok(())
}

fn sell(state: &mut MatchState, id: TowerId) -> Outcome {
    let tower = state.towers.remove(&id).ok_or("unknown tower")?;
    state.release_soldiers_of(&tower);
    state.money += state.rules.sell_refund;
    if state.selected_tower == Some(id) {
        state.selected_tower = None;
    }
    Ok(())
}

fn set_rally_point(state: &mut MatchState, id: TowerId, point: Vec2) -> Outcome {
    let tower = state.towers.get_mut(&id).ok_or("unknown tower")?;
    if tower.kind != TowerKind::Barracks {
        return Err("only barracks have a rally point");
    }
    if tower.pos.distance(point) > tower.stats().range {
        return Err("rally point out of range");
    }
    tower.rally_point = Some(point);
    Ok(())
}

fn move_hero(state: &mut MatchState, to: Vec2) -> Outcome {
    if state.hero.dead {
        return Err("hero is dead");
    }
    if let Some(enemy) = state.hero.fighting.take() {
        state.release(enemy, Blocker::Hero);
    }
    state.hero.state = HeroState::Moving;
    state.hero.move_target = Some(to);
    state.emit(Particle::new(ParticleKind::Waypoint, to, 10, 5.0));
    Ok(())
}

//! Property-based tests for match rules.
//!
//! Random command streams are fed into headless sessions and the economy,
//! lives, upgrade and wave-call rules are checked after every step.
//! Run with: cargo test --release prop_match

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::time::Duration;

use proptest::prelude::*;

use skyguard::content::{HeroId, TowerKind};
use skyguard::game::{EnemyId, TowerId, check_invariants};
use skyguard::geom::Vec2;
use skyguard::scheduler::ManualClock;
use skyguard::{Command, MatchConfig, MatchSession};

/// One randomized player action, resolved against the live match.
#[derive(Debug, Clone, Copy)]
enum Action {
    Build { kind: usize, slot: usize },
    Upgrade { tower: usize, branch: usize },
    Sell { tower: usize },
    MoveHero { x: f64, y: f64 },
    Skill,
    CallWave,
    Wait { ticks: u16 },
}

fn action() -> impl proptest::strategy::Strategy<Value = Action> {
    prop_oneof![
        3 => (0usize..6, 0usize..16).prop_map(|(kind, slot)| Action::Build { kind, slot }),
        2 => (0usize..8, 0usize..3).prop_map(|(tower, branch)| Action::Upgrade { tower, branch }),
        1 => (0usize..8).prop_map(|tower| Action::Sell { tower }),
        1 => (0.0f64..800.0, 0.0f64..450.0).prop_map(|(x, y)| Action::MoveHero { x, y }),
        1 => Just(Action::Skill),
        1 => Just(Action::CallWave),
        4 => (1u16..120).prop_map(|ticks| Action::Wait { ticks }),
    ]
}

fn any_hero() -> impl proptest::strategy::Strategy<Value = HeroId> {
    proptest::sample::select(HeroId::ALL.to_vec())
}

fn session(seed: u64, level: u32, hero: HeroId) -> (MatchSession<ManualClock>, ManualClock) {
    let config = MatchConfig {
        seed,
        level,
        hero,
        ..MatchConfig::default()
    };
    let clock = ManualClock::new();
    let session = MatchSession::with_clock(config, clock.clone()).unwrap();
    (session, clock)
}

fn nth_tower(session: &MatchSession<ManualClock>, index: usize) -> Option<TowerId> {
    let towers = &session.state().towers;
    if towers.is_empty() {
        return None;
    }
    towers.keys().nth(index % towers.len()).copied()
}

/// Resolve an action into a command, or `None` for a wait.
fn command_for(session: &MatchSession<ManualClock>, action: Action) -> Option<Command> {
    match action {
        Action::Build { kind, slot } => {
            let slots = session.state().level.build_slots;
            Some(Command::Build {
                kind: TowerKind::ALL[kind],
                slot: slots[slot % slots.len()],
            })
        }
        Action::Upgrade { tower, branch } => {
            nth_tower(session, tower).map(|tower| Command::Upgrade {
                tower,
                branch: Some(branch),
            })
        }
        Action::Sell { tower } => nth_tower(session, tower).map(|tower| Command::Sell { tower }),
        Action::MoveHero { x, y } => Some(Command::MoveHero {
            to: Vec2::new(x, y),
        }),
        Action::Skill => Some(Command::ActivateSkill),
        Action::CallWave => Some(Command::CallNextWave),
        Action::Wait { .. } => None,
    }
}

/// Expected money change for an accepted command, looked up before applying.
fn expected_delta(session: &MatchSession<ManualClock>, command: Command) -> f64 {
    let state = session.state();
    match command {
        Command::Build { kind, .. } => -f64::from(kind.def().t1.cost),
        Command::Upgrade { tower, branch } => state
            .towers
            .get(&tower)
            .and_then(|t| t.upgrade_cost(branch))
            .map_or(0.0, |(_, cost)| -f64::from(cost)),
        Command::Sell { .. } => state.rules.sell_refund,
        _ => 0.0,
    }
}

fn enemy_hp(session: &MatchSession<ManualClock>) -> BTreeMap<EnemyId, f64> {
    session
        .state()
        .enemies
        .values()
        .map(|e| (e.id, e.hp))
        .collect()
}

fn wait(session: &mut MatchSession<ManualClock>, clock: &ManualClock, ticks: u16) {
    for _ in 0..ticks {
        clock.advance(Duration::from_millis(17));
        session.frame();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Commands move money by exactly the listed price or refund; a
    /// rejected command leaves it untouched.
    #[test]
    fn prop_money_moves_by_exact_amounts(
        seed in any::<u64>(),
        level in 1u32..=8,
        hero in any_hero(),
        actions in prop::collection::vec(action(), 1..60)
    ) {
        let (mut session, clock) = session(seed, level, hero);
        for action in actions {
            if let Action::Wait { ticks } = action {
                wait(&mut session, &clock, ticks);
                continue;
            }
            let Some(command) = command_for(&session, action) else {
                continue;
            };
            let before = session.state().money;
            let delta = expected_delta(&session, command);
            let accepted = session.apply(command);
            let after = session.state().money;
            if accepted {
                prop_assert!((after - (before + delta)).abs() < 1e-9);
            } else {
                prop_assert!((after - before).abs() < f64::EPSILON);
            }
            prop_assert!(after >= 0.0);
        }
    }

    /// Lives only ever go down and never leave `0..=starting_lives`.
    #[test]
    fn prop_lives_bounded_and_monotonic(
        seed in any::<u64>(),
        hero in any_hero(),
        actions in prop::collection::vec(action(), 1..40)
    ) {
        let (mut session, clock) = session(seed, 1, hero);
        let starting = session.state().starting_lives;
        let mut lives = session.state().lives;
        for action in actions {
            match command_for(&session, action) {
                Some(command) => {
                    session.apply(command);
                }
                None => wait(&mut session, &clock, 60),
            }
            let now = session.state().lives;
            prop_assert!(now <= lives);
            prop_assert!(now <= starting);
            lives = now;
            prop_assert!(check_invariants(session.state()).is_empty());
        }
    }

    /// A tower's tier never decreases while it stands.
    #[test]
    fn prop_tiers_never_decrease(
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 1..60)
    ) {
        let (mut session, clock) = session(seed, 1, HeroId::Rin);
        for action in actions {
            let tiers: Vec<(TowerId, u8)> = session
                .state()
                .towers
                .values()
                .map(|t| (t.id, t.tier.number()))
                .collect();
            match command_for(&session, action) {
                Some(command) => {
                    session.apply(command);
                }
                None => wait(&mut session, &clock, 10),
            }
            for (id, tier) in tiers {
                if let Some(tower) = session.state().towers.get(&id) {
                    prop_assert!(tower.tier.number() >= tier);
                }
            }
        }
    }

    /// A second wave call within five seconds of an accepted one is
    /// rejected and changes nothing.
    #[test]
    fn prop_wave_call_rate_limited(
        seed in any::<u64>(),
        gap_ms in 0u64..5_000,
        warmup in 0u16..200
    ) {
        let (mut session, clock) = session(seed, 1, HeroId::Rin);
        wait(&mut session, &clock, warmup);
        prop_assert!(session.apply(Command::CallNextWave));
        let director = *session.director();
        clock.advance(Duration::from_millis(gap_ms));
        prop_assert!(!session.apply(Command::CallNextWave));
        prop_assert_eq!(*session.director(), director);

        clock.advance(Duration::from_millis(5_000 - gap_ms));
        prop_assert!(session.apply(Command::CallNextWave));
    }

    /// No enemy ever gains hit points, whether from a tick or a command.
    #[test]
    fn prop_enemy_hp_never_rises(
        seed in any::<u64>(),
        level in 1u32..=8,
        hero in any_hero(),
        actions in prop::collection::vec(action(), 1..40)
    ) {
        let (mut session, clock) = session(seed, level, hero);
        for action in actions {
            let steps = match action {
                Action::Wait { ticks } => ticks,
                _ => 1,
            };
            for _ in 0..steps {
                let before = enemy_hp(&session);
                match command_for(&session, action) {
                    Some(command) => {
                        session.apply(command);
                    }
                    None => {
                        clock.advance(Duration::from_millis(17));
                        session.frame();
                    }
                }
                for (id, hp) in enemy_hp(&session) {
                    if let Some(&previous) = before.get(&id) {
                        prop_assert!(
                            hp <= previous,
                            "enemy {} went from {} to {} hp at tick {}",
                            id,
                            previous,
                            hp,
                            session.state().tick
                        );
                    }
                }
            }
        }
    }

    /// The same seed and command stream reproduce the same match.
    #[test]
    fn prop_same_inputs_same_match(
        seed in any::<u64>(),
        level in 1u32..=8,
        actions in prop::collection::vec(action(), 1..30)
    ) {
        let run = |actions: &[Action]| {
            let (mut session, clock) = session(seed, level, HeroId::Sakura);
            for &action in actions {
                match command_for(&session, action) {
                    Some(command) => {
                        session.apply(command);
                    }
                    None => wait(&mut session, &clock, 30),
                }
            }
            serde_json::to_string(&session.snapshot()).unwrap()
        };
        prop_assert_eq!(run(&actions), run(&actions));
    }
}

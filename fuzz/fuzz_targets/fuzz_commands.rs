#![no_main]

//! Command stream fuzzer.
//!
//! Feeds arbitrary player commands, interleaved with ticks, into a match and
//! checks the match invariants after every step. Commands may name slots,
//! towers and points that do not exist; they must be rejected cleanly.

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skyguard::content::{HeroId, TowerKind};
use skyguard::game::{TowerId, check_invariants};
use skyguard::geom::Vec2;
use skyguard::scheduler::ManualClock;
use skyguard::{Command, MatchConfig, MatchSession};

/// A fuzzer-generated player action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    /// Build on slot `slot` (wrapped), or at a raw point when `raw` is set.
    Build { kind: u8, slot: u8, raw: Option<(i16, i16)> },
    /// Upgrade a tower by raw id.
    Upgrade { tower: u8, branch: Option<u8> },
    /// Sell a tower by raw id.
    Sell { tower: u8 },
    /// Move a rally point.
    Rally { tower: u8, x: i16, y: i16 },
    /// Walk the hero.
    MoveHero { x: i16, y: i16 },
    /// Fire the hero skill.
    Skill,
    /// Call the next wave.
    CallWave,
    /// Pause or resume.
    Pause(bool),
    /// Select a tower by raw id.
    Select(Option<u8>),
    /// Advance the wall clock this many milliseconds, one frame per 17 ms.
    Wait { ms: u16 },
}

/// Structured input for command fuzzing.
#[derive(Arbitrary, Debug)]
struct CommandInput {
    seed: u64,
    level: u8,
    hero: u8,
    actions: Vec<FuzzAction>,
}

fn point(x: i16, y: i16) -> Vec2 {
    Vec2::new(f64::from(x), f64::from(y))
}

fn to_command(session: &MatchSession<ManualClock>, action: FuzzAction) -> Option<Command> {
    let command = match action {
        FuzzAction::Build { kind, slot, raw } => {
            let kind = TowerKind::ALL[usize::from(kind) % TowerKind::ALL.len()];
            let slots = session.state().level.build_slots;
            let slot = match raw {
                Some((x, y)) => point(x, y),
                None => *slots.get(usize::from(slot) % slots.len().max(1))?,
            };
            Command::Build { kind, slot }
        }
        FuzzAction::Upgrade { tower, branch } => Command::Upgrade {
            tower: TowerId(u32::from(tower)),
            branch: branch.map(usize::from),
        },
        FuzzAction::Sell { tower } => Command::Sell {
            tower: TowerId(u32::from(tower)),
        },
        FuzzAction::Rally { tower, x, y } => Command::SetRallyPoint {
            tower: TowerId(u32::from(tower)),
            point: point(x, y),
        },
        FuzzAction::MoveHero { x, y } => Command::MoveHero { to: point(x, y) },
        FuzzAction::Skill => Command::ActivateSkill,
        FuzzAction::CallWave => Command::CallNextWave,
        FuzzAction::Pause(paused) => Command::SetPaused(paused),
        FuzzAction::Select(tower) => Command::SelectTower(tower.map(|t| TowerId(u32::from(t)))),
        FuzzAction::Wait { .. } => return None,
    };
    Some(command)
}

fuzz_target!(|input: CommandInput| {
    let config = MatchConfig {
        seed: input.seed,
        level: u32::from(input.level % 8) + 1,
        hero: HeroId::ALL[usize::from(input.hero) % HeroId::ALL.len()],
        ..MatchConfig::default()
    };
    let clock = ManualClock::new();
    let mut session = match MatchSession::with_clock(config, clock.clone()) {
        Ok(session) => session,
        Err(_) => return,
    };

    // Cap the stream to keep each run short
    for action in input.actions.into_iter().take(64) {
        if let FuzzAction::Wait { ms } = action {
            for _ in 0..(ms % 2_000) / 17 {
                clock.advance(Duration::from_millis(17));
                session.frame();
            }
        } else if let Some(command) = to_command(&session, action) {
            let money = session.state().money;
            let accepted = session.apply(command);
            if !accepted {
                assert_eq!(session.state().money.to_bits(), money.to_bits());
            }
        }

        let violations = check_invariants(session.state());
        assert!(
            violations.is_empty(),
            "invariants violated at tick {}: {:?}",
            session.state().tick,
            violations
        );
    }
});

// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Skyguard: a deterministic fixed-tick tower-defense simulation.
//!
//! Waves of enemies walk fixed paths towards a goal while the player builds
//! and upgrades towers and commands a hero to intercept them. This crate
//! provides:
//! - A per-tick simulation core with no ambient state
//! - A 60 Hz frame scheduler driven by an injected clock
//! - Scripted players and a parallel headless batch runner
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / TUI  ·  batch  ·  autopilot │
//! ├─────────────────────────────────────┤
//! │  MatchSession + FrameScheduler      │
//! ├─────────────────────────────────────┤
//! │  game: waves, combat, projectiles,  │
//! │        skills, economy, commands    │
//! ├─────────────────────────────────────┤
//! │  content: heroes, enemies, towers,  │
//! │           levels                    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Determinism
//!
//! Every random draw comes from one seeded generator owned by the match, and
//! every cooldown counts logical ticks. The same seed and the same command
//! stream at the same ticks always produce the same match.

pub mod autopilot;
pub mod batch;
pub mod config;
pub mod content;
pub mod error;
pub mod game;
pub mod geom;
pub mod scheduler;
pub mod session;

pub use config::MatchConfig;
pub use error::{ConfigError, MatchError};

// Re-export key game types at crate root for convenience
pub use game::{Command, MatchOutcome, MatchState, Snapshot};
pub use session::MatchSession;

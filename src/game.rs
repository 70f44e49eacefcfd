//! Match simulation.
//!
//! One call to [`run_tick`] advances the match by one logical tick:
//! - Wave director (clear check, then spawning)
//! - Towers, soldiers and the hero
//! - Enemy status effects and movement
//! - Projectiles
//! - Casualties, leaks and passive income
//!
//! Player intent enters through [`apply_command`] between ticks.

pub mod combat;
pub mod command;
pub mod economy;
pub mod entities;
pub mod hero;
pub mod ids;
pub mod invariants;
pub mod projectile;
pub mod skill;
pub mod state;
pub mod tick;
pub mod wave;

pub use command::{Command, apply_command};
pub use entities::{
    Blocker, Enemy, Particle, ParticleKind, Projectile, SkillEffect, SkillEffectKind, Soldier,
    StatusTimers, Tier, Tower,
};
pub use hero::{Hero, HeroState, HeroStats};
pub use ids::{EnemyId, IdAllocator, ProjectileId, SoldierId, TowerId};
pub use invariants::{InvariantViolation, check_invariants};
pub use state::{MatchOutcome, MatchRules, MatchState, Snapshot};
pub use tick::run_tick;
pub use wave::WaveDirector;

//! One logical simulation step.

use crate::game::{MatchOutcome, MatchState, WaveDirector, combat, economy, projectile};

/// Advance the match by one logical tick.
///
/// A no-op once the match has ended. Pausing is the scheduler's concern:
/// calling this on a paused state still advances it.
pub fn run_tick(state: &mut MatchState, director: &mut WaveDirector) {
    if state.is_terminal() {
        return;
    }
    state.tick += 1;

    decay_cosmetics(state);
    director.advance(state);
    combat::resolve(state);
    projectile::resolve(state);
    economy::settle_casualties(state);
    economy::accrue_passive(state);
    update_outcome(state);

    tracing::trace!(
        target: "skyguard::tick",
        tick = state.tick,
        enemies = state.enemies.len(),
        projectiles = state.projectiles.len(),
        money = state.money,
        lives = state.lives,
    );
}

fn decay_cosmetics(state: &mut MatchState) {
    state.particles.retain_mut(|particle| {
        particle.life = particle.life.saturating_sub(1);
        particle.life > 0
    });
    if let Some(effect) = &mut state.skill_effect {
        effect.timer = effect.timer.saturating_sub(1);
        if effect.timer == 0 {
            state.skill_effect = None;
        }
    }
}

fn update_outcome(state: &mut MatchState) {
    let outcome = if state.lives == 0 {
        MatchOutcome::Defeat
    } else if state.wave > state.victory_wave {
        MatchOutcome::Victory
    } else {
        return;
    };
    state.outcome = outcome;
    tracing::info!(
        target: "skyguard::tick",
        ?outcome,
        wave = state.wave,
        tick = state.tick,
        score = state.score,
        "match ended"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::game::{Particle, ParticleKind, SkillEffect, SkillEffectKind};
    use crate::geom::Vec2;

    fn state() -> MatchState {
        MatchState::new(&MatchConfig::default()).unwrap()
    }

    #[test]
    fn test_tick_counter_advances() {
        let mut state = state();
        let mut director = WaveDirector::default();
        for _ in 0..10 {
            run_tick(&mut state, &mut director);
        }
        assert_eq!(state.tick, 10);
    }

    #[test]
    fn test_passive_income_accrues() {
        let mut state = state();
        let mut director = WaveDirector::default();
        let before = state.money;
        for _ in 0..20 {
            run_tick(&mut state, &mut director);
        }
        assert!((state.money - before - 20.0 * 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_particles_expire() {
        let mut state = state();
        let mut director = WaveDirector::default();
        state.emit(Particle::new(ParticleKind::Impact, Vec2::new(1.0, 1.0), 2, 4.0));
        run_tick(&mut state, &mut director);
        assert_eq!(state.particles.len(), 1);
        assert_eq!(state.particles[0].life, 1);
        run_tick(&mut state, &mut director);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_skill_effect_clears_after_timer() {
        let mut state = state();
        let mut director = WaveDirector::default();
        state.skill_effect = Some(SkillEffect {
            kind: SkillEffectKind::RinBlast,
            timer: 3,
            pos: Vec2::new(0.0, 0.0),
        });
        for _ in 0..2 {
            run_tick(&mut state, &mut director);
        }
        assert_eq!(state.skill_effect.map(|e| e.timer), Some(1));
        run_tick(&mut state, &mut director);
        assert!(state.skill_effect.is_none());
    }

    #[test]
    fn test_zero_lives_is_defeat_and_freezes() {
        let mut state = state();
        let mut director = WaveDirector::default();
        state.lives = 0;
        run_tick(&mut state, &mut director);
        assert_eq!(state.outcome, MatchOutcome::Defeat);
        let frozen = (state.tick, state.money);
        run_tick(&mut state, &mut director);
        assert_eq!(state.tick, frozen.0);
        assert!((state.money - frozen.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_passing_last_wave_is_victory() {
        let mut state = state();
        let mut director = WaveDirector::default();
        state.victory_wave = 1;
        state.wave = 2;
        run_tick(&mut state, &mut director);
        assert_eq!(state.outcome, MatchOutcome::Victory);
        assert!(state.is_terminal());
    }
}

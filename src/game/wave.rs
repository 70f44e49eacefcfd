//! Wave director: when, what and how many enemies to spawn.
//!
//! The director keeps its counters outside [`MatchState`] so that the
//! committed match state only holds what presentation needs.

use std::time::Duration;

use rand::Rng;

use crate::content::EnemyKind;
use crate::game::{Enemy, MatchState, StatusTimers};

/// Empty ticks after the last enemy before the next wave starts.
pub const CLEAR_DELAY_TICKS: u32 = 120;
/// Minimum real time between manual wave calls.
pub const NEXT_WAVE_COOLDOWN: Duration = Duration::from_secs(5);
/// Chance of a boss replacing a regular spawn on every fifth wave.
pub const BOSS_CHANCE: f64 = 0.3;

/// Enemies that make up `wave`.
#[must_use]
pub const fn target_for_wave(wave: u32) -> u32 {
    10 + wave.saturating_mul(3) / 2
}

/// Ticks between spawns during `wave`.
#[must_use]
pub const fn spawn_interval(wave: u32) -> u32 {
    let interval = 100u32.saturating_sub(wave.saturating_mul(4));
    if interval < 30 { 30 } else { interval }
}

/// Size of the prefix of the enemy roster that `wave` draws from.
#[must_use]
pub const fn kind_pool(wave: u32) -> usize {
    match wave {
        0..=5 => 4,
        6..=10 => 6,
        11..=15 => 8,
        _ => 9,
    }
}

/// Hit point multiplier applied to spawns of `wave`.
#[must_use]
pub fn hp_scale(wave: u32) -> f64 {
    1.1f64.powf(f64::from(wave.saturating_sub(1)))
}

/// Spawn and wave-transition bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveDirector {
    spawned: u32,
    to_spawn: u32,
    spawn_timer: u32,
    clear_countdown: u32,
    last_manual_call: Option<Duration>,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new(1)
    }
}

impl WaveDirector {
    /// Director at the start of `wave`.
    #[must_use]
    pub const fn new(wave: u32) -> Self {
        Self {
            spawned: 0,
            to_spawn: target_for_wave(wave),
            spawn_timer: 0,
            clear_countdown: 0,
            last_manual_call: None,
        }
    }

    /// Enemies spawned so far this wave.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Enemies this wave will spawn in total.
    #[must_use]
    pub const fn to_spawn(&self) -> u32 {
        self.to_spawn
    }

    /// Empty ticks counted towards the next wave.
    #[must_use]
    pub const fn clear_countdown(&self) -> u32 {
        self.clear_countdown
    }

    /// Whether every enemy of the wave has spawned.
    #[must_use]
    pub const fn wave_spawned(&self) -> bool {
        self.spawned >= self.to_spawn
    }

    /// Run the clear check and the spawn cadence for one tick.
    pub fn advance(&mut self, state: &mut MatchState) {
        if state.enemies.is_empty() && self.wave_spawned() {
            self.clear_countdown = self.clear_countdown.saturating_add(1);
            if self.clear_countdown > CLEAR_DELAY_TICKS {
                self.start_next_wave(state);
            }
        }

        if !self.wave_spawned() {
            self.spawn_timer += 1;
            if self.spawn_timer > spawn_interval(state.wave) {
                self.spawn_timer = 0;
                self.spawned += 1;
                spawn_enemy(state);
            }
        }
    }

    /// Skip the remaining clear delay.
    ///
    /// The transition still waits for the field to be empty. Returns `false`
    /// if the previous call was less than [`NEXT_WAVE_COOLDOWN`] ago.
    pub fn call_next_wave(&mut self, now: Duration) -> bool {
        if self
            .last_manual_call
            .is_some_and(|last| now.saturating_sub(last) < NEXT_WAVE_COOLDOWN)
        {
            return false;
        }
        self.last_manual_call = Some(now);
        self.clear_countdown = CLEAR_DELAY_TICKS + 1;
        true
    }

    fn start_next_wave(&mut self, state: &mut MatchState) {
        let bonus = 100 + state.wave.saturating_mul(10);
        state.money += f64::from(bonus);
        state.wave = state.wave.saturating_add(1);
        self.spawned = 0;
        self.to_spawn = target_for_wave(state.wave);
        self.spawn_timer = 0;
        self.clear_countdown = 0;
        tracing::info!(
            target: "skyguard::wave",
            wave = state.wave,
            bonus,
            enemies = self.to_spawn,
            "wave started"
        );
    }
}

fn spawn_enemy(state: &mut MatchState) {
    let paths = state.level.paths;
    if paths.is_empty() {
        return;
    }
    let path = state.rng.gen_range(0..paths.len());
    let index = state.rng.gen_range(0..kind_pool(state.wave));
    let boss = state.wave % 5 == 0 && state.rng.gen_bool(BOSS_CHANCE);
    let kind = if boss {
        EnemyKind::BOSS
    } else {
        EnemyKind::from_index(index).unwrap_or(EnemyKind::Slime)
    };
    if boss {
        tracing::debug!(target: "skyguard::wave", wave = state.wave, "boss spawned");
    }

    let def = kind.def();
    let hp = (def.base_hp * hp_scale(state.wave)).floor();
    let id = state.ids.enemy();
    state.enemies.insert(
        id,
        Enemy {
            id,
            kind,
            pos: paths[path].first().copied().unwrap_or_default(),
            hp,
            max_hp: hp,
            speed: def.speed,
            path,
            path_index: 0,
            flying: def.flying,
            blocked_by: None,
            status: StatusTimers::default(),
            finished: false,
        },
    );
}

/// Kani proofs for the difficulty curve.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Wave sizes grow with the wave number and never wrap.
    #[kani::proof]
    fn prove_target_monotonic() {
        let wave: u32 = kani::any();
        kani::assume(wave < u32::MAX);
        assert!(target_for_wave(wave + 1) >= target_for_wave(wave));
    }

    /// The spawn interval stays inside its clamp.
    #[kani::proof]
    fn prove_spawn_interval_clamped() {
        let wave: u32 = kani::any();
        let interval = spawn_interval(wave);
        assert!((30..=100).contains(&interval));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;

    fn state() -> MatchState {
        MatchState::new(&MatchConfig::default()).unwrap()
    }

    #[test]
    fn test_wave_sizes() {
        assert_eq!(target_for_wave(1), 11);
        assert_eq!(target_for_wave(2), 13);
        assert_eq!(target_for_wave(5), 17);
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert_eq!(spawn_interval(1), 96);
        assert_eq!(spawn_interval(10), 60);
        assert_eq!(spawn_interval(18), 30);
        assert_eq!(spawn_interval(500), 30);
    }

    #[test]
    fn test_kind_pool_unlocks_by_wave() {
        assert_eq!(kind_pool(1), 4);
        assert_eq!(kind_pool(5), 4);
        assert_eq!(kind_pool(6), 6);
        assert_eq!(kind_pool(15), 8);
        assert_eq!(kind_pool(16), 9);
    }

    #[test]
    fn test_hp_scale_compounds() {
        assert!((hp_scale(1) - 1.0).abs() < 1e-12);
        assert!((hp_scale(3) - 1.21).abs() < 1e-12);
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let mut state = state();
        let mut director = WaveDirector::default();
        for _ in 0..96 {
            director.advance(&mut state);
        }
        assert!(state.enemies.is_empty());
        director.advance(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(director.spawned(), 1);

        let enemy = state.enemies.values().next().unwrap();
        assert!(enemy.kind.def().reward > 0);
        assert_eq!(enemy.path_index, 0);
        assert_eq!(enemy.pos, state.level.paths[enemy.path][0]);
        assert!((enemy.hp - enemy.kind.def().base_hp).abs() < f64::EPSILON);
    }

    #[test]
    fn test_early_waves_draw_from_first_four_kinds() {
        let mut state = state();
        let mut director = WaveDirector::default();
        while !director.wave_spawned() {
            director.advance(&mut state);
        }
        assert_eq!(state.enemies.len(), 11);
        assert!(state.enemies.values().all(|e| (e.kind as usize) < 4));
    }

    #[test]
    fn test_manual_call_is_rate_limited() {
        let mut director = WaveDirector::default();
        assert!(director.call_next_wave(Duration::from_secs(1)));
        assert!(!director.call_next_wave(Duration::from_millis(5999)));
        assert!(director.call_next_wave(Duration::from_secs(6)));
    }

    #[test]
    fn test_manual_call_waits_for_clear_field() {
        let mut state = state();
        let mut director = WaveDirector::default();
        director.call_next_wave(Duration::ZERO);
        director.advance(&mut state);
        assert_eq!(state.wave, 1);

        let mut director = WaveDirector {
            spawned: 11,
            ..WaveDirector::default()
        };
        director.call_next_wave(Duration::ZERO);
        director.advance(&mut state);
        assert_eq!(state.wave, 2);
        assert_eq!(director.to_spawn(), 13);
    }
}

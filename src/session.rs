//! Match sessions.
//!
//! A [`MatchSession`] owns everything one match needs: the state, the wave
//! director, the frame scheduler and the real-time task queue. Nothing
//! about a match lives outside its session, so any number of sessions can
//! run side by side.

use std::time::Duration;

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::game::{Command, MatchState, Snapshot, WaveDirector, apply_command, run_tick};
use crate::scheduler::{Clock, DelayedAction, FrameScheduler, SystemClock, TaskQueue};

/// How long the hero's skill-active flag stays up after activation.
pub const SKILL_FLAG_DURATION: Duration = Duration::from_secs(1);

/// One running match plus the clock that drives it.
#[derive(Debug)]
pub struct MatchSession<C: Clock = SystemClock> {
    config: MatchConfig,
    state: MatchState,
    director: WaveDirector,
    scheduler: FrameScheduler,
    tasks: TaskQueue,
    clock: C,
    generation: u64,
    modal_open: bool,
}

impl MatchSession<SystemClock> {
    /// Start a match on the wall clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> MatchSession<C> {
    /// Start a match driven by `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_clock(config: MatchConfig, clock: C) -> Result<Self, MatchError> {
        let state = MatchState::new(&config)?;
        let mut scheduler = FrameScheduler::default();
        scheduler.reset(clock.now());
        log_start(&config, 0);
        Ok(Self {
            config,
            state,
            director: WaveDirector::default(),
            scheduler,
            tasks: TaskQueue::new(),
            clock,
            generation: 0,
            modal_open: false,
        })
    }

    /// Current match state.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Wave director counters.
    #[must_use]
    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    /// Configuration the match was started from.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The driving clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Incremented on every restart.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Delayed tasks still waiting, including stale ones.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Read-only view for presentation.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    /// Whether a modal overlay is open.
    #[must_use]
    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    /// Whether frames are currently skipped.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.state.paused || self.modal_open
    }

    /// Open or close a modal overlay. An open modal suspends the match.
    pub fn set_modal(&mut self, open: bool) {
        self.modal_open = open;
    }

    /// Submit a player command. Returns whether it was accepted.
    pub fn apply(&mut self, command: Command) -> bool {
        let now = self.clock.now();
        let accepted = apply_command(&mut self.state, &mut self.director, command, now);
        if accepted && command == Command::ActivateSkill {
            self.tasks.schedule(
                now + SKILL_FLAG_DURATION,
                self.generation,
                DelayedAction::ClearSkillActive,
            );
        }
        accepted
    }

    /// Handle one display frame. Returns whether a logical tick ran.
    ///
    /// Due real-time tasks run first, whether or not the match is suspended.
    pub fn frame(&mut self) -> bool {
        let now = self.clock.now();
        self.run_due_tasks(now);
        if self.scheduler.on_frame(now, self.is_suspended()) {
            self.tick();
            true
        } else {
            false
        }
    }

    /// Run one logical tick immediately, bypassing the scheduler.
    pub fn tick(&mut self) {
        run_tick(&mut self.state, &mut self.director);
    }

    /// Throw the match away and start over from the same configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration no longer validates.
    pub fn restart(&mut self) -> Result<(), MatchError> {
        let config = self.config.clone();
        self.restart_with(config)
    }

    /// Throw the match away and start a new one from `config`.
    ///
    /// Tasks scheduled by the old match stay queued but will be ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid; the running match is kept.
    pub fn restart_with(&mut self, config: MatchConfig) -> Result<(), MatchError> {
        self.state = MatchState::new(&config)?;
        self.config = config;
        self.director = WaveDirector::default();
        self.scheduler.reset(self.clock.now());
        self.modal_open = false;
        self.generation += 1;
        log_start(&self.config, self.generation);
        Ok(())
    }

    fn run_due_tasks(&mut self, now: Duration) {
        for task in self.tasks.take_due(now) {
            if task.generation != self.generation {
                tracing::debug!(
                    target: "skyguard::session",
                    task = ?task.action,
                    scheduled = task.generation,
                    current = self.generation,
                    "dropping stale task"
                );
                continue;
            }
            match task.action {
                DelayedAction::ClearSkillActive => self.state.hero.skill_active = false,
            }
        }
    }
}

fn log_start(config: &MatchConfig, generation: u64) {
    tracing::info!(
        target: "skyguard::session",
        level = config.level,
        hero = config.hero.as_str(),
        seed = config.seed,
        generation,
        "match started"
    );
}

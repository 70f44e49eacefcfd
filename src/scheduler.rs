//! Frame scheduling against an injected clock.
//!
//! The presentation layer calls into the session once per display frame.
//! The [`FrameScheduler`] turns those calls into logical ticks at a fixed
//! rate of [`TICKS_PER_SECOND`](crate::content::TICKS_PER_SECOND): at most
//! one tick per frame, and only once a full tick interval has passed since
//! the last one. Frames arriving while the match is suspended are skipped
//! and never replayed later.
//!
//! Real-time side effects that must not depend on the tick rate go through
//! a [`TaskQueue`]. Each task carries the generation of the session that
//! scheduled it, so a task outliving a restart can be recognized and
//! dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Real time between two logical ticks.
pub const TICK_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Source of real time, as elapsed time since some fixed origin.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock measured from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same reading, so a test or headless driver can keep a
/// handle while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock stopped at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_nanos(by), Ordering::Relaxed);
    }

    /// Jump to an absolute reading.
    pub fn set(&self, to: Duration) {
        self.nanos.store(duration_nanos(to), Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Decides which frames run a logical tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameScheduler {
    interval: Duration,
    last_tick: Duration,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl FrameScheduler {
    /// Scheduler ticking every `interval`, starting from time zero.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Duration::ZERO,
        }
    }

    /// Real time between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Handle one display frame at `now`. Returns whether to run a tick.
    ///
    /// While `suspended`, the reference point follows the frames so that
    /// resuming does not release a burst of missed ticks. Time beyond one
    /// interval is likewise discarded rather than carried over.
    pub fn on_frame(&mut self, now: Duration, suspended: bool) -> bool {
        if suspended {
            self.last_tick = now;
            return false;
        }
        if now.saturating_sub(self.last_tick) >= self.interval {
            self.last_tick = now;
            return true;
        }
        false
    }

    /// Restart the interval from `now`.
    pub fn reset(&mut self, now: Duration) {
        self.last_tick = now;
    }
}

/// Side effects applied on real-time deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayedAction {
    /// Clear the hero's skill-active flag.
    ClearSkillActive,
}

/// A delayed action bound to the session generation that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedTask {
    /// Clock reading at which the task becomes due.
    pub due: Duration,
    /// Generation of the session at scheduling time.
    pub generation: u64,
    /// What to do.
    pub action: DelayedAction,
}

/// Pending delayed tasks.
///
/// Tasks are never cancelled; consumers compare generations instead.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<DelayedTask>,
}

impl TaskQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Queue `action` to run once the clock reaches `due`.
    pub fn schedule(&mut self, due: Duration, generation: u64, action: DelayedAction) {
        self.tasks.push(DelayedTask {
            due,
            generation,
            action,
        });
    }

    /// Remove and return every task due at `now`, earliest first.
    ///
    /// Tasks with equal deadlines keep their scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<DelayedTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.due <= now);
        self.tasks = pending;
        due.sort_by_key(|task| task.due);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_tick_interval_is_sixty_hertz() {
        assert_eq!(TICK_INTERVAL.as_nanos(), 16_666_666);
    }

    #[test]
    fn test_fast_frames_tick_at_fixed_rate() {
        let mut scheduler = FrameScheduler::default();
        let mut ticks = 0;
        // 240 Hz display for one second.
        for frame in 1..=240u32 {
            let now = Duration::from_micros(u64::from(frame) * 4167);
            if scheduler.on_frame(now, false) {
                ticks += 1;
            }
        }
        assert!((48..=60).contains(&ticks), "{ticks} ticks");
    }

    #[test]
    fn test_slow_frames_do_not_catch_up() {
        let mut scheduler = FrameScheduler::default();
        assert!(scheduler.on_frame(100 * MS, false));
        assert!(scheduler.on_frame(200 * MS, false));
        assert!(!scheduler.on_frame(210 * MS, false));
    }

    #[test]
    fn test_suspension_skips_without_burst() {
        let mut scheduler = FrameScheduler::default();
        assert!(scheduler.on_frame(20 * MS, false));
        for step in 1..=100u32 {
            assert!(!scheduler.on_frame((20 + step * 10) * MS, true));
        }
        assert!(!scheduler.on_frame(1025 * MS, false));
        assert!(scheduler.on_frame(1037 * MS, false));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(250 * MS);
        assert_eq!(clock.now(), 250 * MS);
        clock.set(Duration::from_secs(3));
        assert_eq!(handle.now(), Duration::from_secs(3));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_task_queue_releases_due_tasks_in_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(30 * MS, 1, DelayedAction::ClearSkillActive);
        queue.schedule(10 * MS, 2, DelayedAction::ClearSkillActive);
        queue.schedule(50 * MS, 3, DelayedAction::ClearSkillActive);

        assert!(queue.take_due(5 * MS).is_empty());
        let due = queue.take_due(30 * MS);
        assert_eq!(due.iter().map(|t| t.generation).collect::<Vec<_>>(), [2, 1]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.take_due(Duration::from_secs(1)).len(), 1);
        assert!(queue.is_empty());
    }
}

//! Countdown engine.
//!
//! A two-state machine driven by an external tick source. The engine owns
//! the only tick handle it ever creates and cancels it on every path out of
//! `Running`, so no recurring tick can outlive the countdown.
//!
//! ## State Transitions
//!
//! ```text
//! initialize (s > 0)  -> Running
//! initialize (s == 0) -> Idle + expiry
//! Running --tick--> Running        (s > 0 after decrement)
//! Running --tick--> Idle + expiry  (s == 0 after decrement)
//! Idle --*--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(target, SystemClock, scheduler);
//! engine.initialize();
//! // Each time the scheduler delivers a tick:
//! engine.tick(); // Some(Event::CountdownExpired { .. }) at zero
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::format::TimeParts;
use super::ticker::{TickHandle, TickScheduler};
use crate::celebration::CelebrationController;
use crate::clock::Clock;
use crate::events::Event;
use crate::target::TargetMoment;

/// Every tick accounts for exactly one second.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Idle,
}

/// How a tick updates the remaining seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftPolicy {
    /// Subtract exactly one second per tick.
    #[default]
    Decrement,
    /// Re-derive from the absolute target on every tick, still advancing at
    /// least one second. Corrects the display after the host was suspended.
    Resync,
}

/// Read-only view of the engine's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub seconds_remaining: u64,
    pub status: TimerStatus,
    pub celebration_active: bool,
}

pub struct CountdownEngine<S: TickScheduler, C: Clock> {
    target: TargetMoment,
    clock: C,
    scheduler: S,
    /// Present exactly while `status == Running`.
    handle: Option<S::Handle>,
    seconds_remaining: u64,
    status: TimerStatus,
    celebration: CelebrationController,
    policy: DriftPolicy,
}

impl<S: TickScheduler, C: Clock> CountdownEngine<S, C> {
    /// Create an engine for `target`. Nothing is scheduled until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(target: TargetMoment, clock: C, scheduler: S) -> Self {
        Self {
            target,
            clock,
            scheduler,
            handle: None,
            seconds_remaining: 0,
            status: TimerStatus::Idle,
            celebration: CelebrationController::new(),
            policy: DriftPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DriftPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        CountdownState {
            seconds_remaining: self.seconds_remaining,
            status: self.status,
            celebration_active: self.celebration.is_active(),
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn time_parts(&self) -> TimeParts {
        TimeParts::from_seconds(self.seconds_remaining)
    }

    pub fn target(&self) -> &TargetMoment {
        &self.target
    }

    pub fn celebration(&self) -> &CelebrationController {
        &self.celebration
    }

    /// Whether a recurring tick is currently scheduled.
    pub fn has_live_tick(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_active())
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            seconds_remaining: self.seconds_remaining,
            time: self.time_parts(),
            celebration_active: self.celebration.is_active(),
            target: self.target.instant,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Derive the remaining seconds from the clock and enter the matching
    /// state. Any previously scheduled tick is cancelled first.
    ///
    /// Returns `CountdownStarted` when time remains, `CountdownExpired` the
    /// first time the countdown is found at zero, and a snapshot when it had
    /// already expired.
    pub fn initialize(&mut self) -> Event {
        self.cancel_tick();

        let now = self.clock.now();
        self.seconds_remaining = self.target.seconds_until(now);

        if self.seconds_remaining > 0 {
            self.status = TimerStatus::Running;
            self.handle = Some(self.scheduler.schedule_every(DEFAULT_TICK_PERIOD));
            info!(
                seconds_remaining = self.seconds_remaining,
                target = %self.target.instant,
                "countdown started"
            );
            Event::CountdownStarted {
                seconds_remaining: self.seconds_remaining,
                target: self.target.instant,
                at: now,
            }
        } else {
            self.status = TimerStatus::Idle;
            self.expire().unwrap_or_else(|| self.snapshot())
        }
    }

    /// Apply one tick. Returns `None` when idle.
    pub fn tick(&mut self) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }

        let decremented = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining = match self.policy {
            DriftPolicy::Decrement => decremented,
            DriftPolicy::Resync => {
                let derived = self.target.seconds_until(self.clock.now());
                if derived < decremented {
                    debug!(
                        from = self.seconds_remaining,
                        to = derived,
                        "resynced countdown after a late tick"
                    );
                }
                derived.min(decremented)
            }
        };

        if self.seconds_remaining == 0 {
            self.cancel_tick();
            self.status = TimerStatus::Idle;
            return self.expire();
        }

        debug!(seconds_remaining = self.seconds_remaining, "tick");
        Some(Event::Tick {
            seconds_remaining: self.seconds_remaining,
            at: self.clock.now(),
        })
    }

    /// Cancel the recurring tick. Safe to call any number of times.
    ///
    /// A running countdown is left frozen at its current value; there is no
    /// way to resume it other than [`initialize`](Self::initialize).
    pub fn shutdown(&mut self) {
        if self.status == TimerStatus::Running {
            debug!(seconds_remaining = self.seconds_remaining, "countdown torn down");
        }
        self.cancel_tick();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel_tick(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
    }

    fn expire(&mut self) -> Option<Event> {
        let now = self.clock.now();
        if !self.celebration.activate(now) {
            return None;
        }
        info!(year = ?self.target.year, "countdown expired");
        Some(Event::CountdownExpired {
            year: self.target.year,
            at: now,
        })
    }
}

impl<S: TickScheduler, C: Clock> Drop for CountdownEngine<S, C> {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::target::{new_year_of, TargetZone};
    use crate::timer::ManualScheduler;
    use chrono::Duration as ChronoDuration;

    fn engine_at(
        secs_before: i64,
    ) -> (
        CountdownEngine<ManualScheduler, ManualClock>,
        ManualClock,
        ManualScheduler,
    ) {
        let target = new_year_of(2026, TargetZone::default());
        let clock = ManualClock::new(target.instant - ChronoDuration::seconds(secs_before));
        let scheduler = ManualScheduler::new();
        let engine = CountdownEngine::new(target, clock.clone(), scheduler.clone());
        (engine, clock, scheduler)
    }

    #[test]
    fn initialize_with_time_left_runs() {
        let (mut engine, _clock, scheduler) = engine_at(10);
        let event = engine.initialize();
        assert!(matches!(
            event,
            Event::CountdownStarted {
                seconds_remaining: 10,
                ..
            }
        ));
        assert_eq!(engine.status(), TimerStatus::Running);
        assert_eq!(scheduler.live_handles(), 1);
        assert_eq!(scheduler.last_period(), Some(DEFAULT_TICK_PERIOD));
    }

    #[test]
    fn initialize_at_target_expires_immediately() {
        let (mut engine, _clock, scheduler) = engine_at(0);
        let event = engine.initialize();
        assert!(event.is_expiry());
        assert_eq!(
            engine.state(),
            CountdownState {
                seconds_remaining: 0,
                status: TimerStatus::Idle,
                celebration_active: true,
            }
        );
        assert_eq!(scheduler.created_handles(), 0);
    }

    #[test]
    fn ticks_decrement_until_expiry() {
        let (mut engine, _clock, scheduler) = engine_at(3);
        engine.initialize();

        assert!(matches!(
            engine.tick(),
            Some(Event::Tick {
                seconds_remaining: 2,
                ..
            })
        ));
        assert!(matches!(
            engine.tick(),
            Some(Event::Tick {
                seconds_remaining: 1,
                ..
            })
        ));
        assert_eq!(engine.status(), TimerStatus::Running);

        let last = engine.tick();
        assert!(last.as_ref().is_some_and(Event::is_expiry));
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert!(engine.celebration().is_active());
        assert_eq!(scheduler.live_handles(), 0);
        assert!(!engine.has_live_tick());

        assert_eq!(engine.tick(), None);
    }

    #[test]
    fn reinitialize_replaces_the_tick_handle() {
        let (mut engine, _clock, scheduler) = engine_at(100);
        engine.initialize();
        engine.initialize();
        assert_eq!(scheduler.created_handles(), 2);
        assert_eq!(scheduler.live_handles(), 1);
    }

    #[test]
    fn reinitialize_after_expiry_does_not_expire_twice() {
        let (mut engine, _clock, _scheduler) = engine_at(0);
        assert!(engine.initialize().is_expiry());
        assert!(matches!(engine.initialize(), Event::StateSnapshot { .. }));
    }

    #[test]
    fn shutdown_and_drop_cancel_the_tick() {
        let (mut engine, _clock, scheduler) = engine_at(100);
        engine.initialize();
        engine.shutdown();
        engine.shutdown();
        assert_eq!(scheduler.live_handles(), 0);

        let (mut engine, _clock, scheduler) = engine_at(100);
        engine.initialize();
        drop(engine);
        assert_eq!(scheduler.live_handles(), 0);
    }

    #[test]
    fn decrement_policy_ignores_clock_jumps() {
        let (mut engine, clock, _scheduler) = engine_at(3_600);
        engine.initialize();
        clock.advance(ChronoDuration::seconds(1_800));
        engine.tick();
        assert_eq!(engine.seconds_remaining(), 3_599);
    }

    #[test]
    fn resync_policy_catches_up_after_suspension() {
        let (engine, clock, _scheduler) = engine_at(3_600);
        let mut engine = engine.with_policy(DriftPolicy::Resync);
        engine.initialize();

        clock.advance(ChronoDuration::seconds(1_800));
        engine.tick();
        assert_eq!(engine.seconds_remaining(), 1_800);

        // An early tick with no clock movement still advances one second.
        engine.tick();
        assert_eq!(engine.seconds_remaining(), 1_799);
    }

    #[test]
    fn resync_policy_expires_when_target_passed_while_suspended() {
        let (engine, clock, scheduler) = engine_at(60);
        let mut engine = engine.with_policy(DriftPolicy::Resync);
        engine.initialize();
        clock.advance(ChronoDuration::seconds(600));
        assert!(engine.tick().is_some_and(|e| e.is_expiry()));
        assert_eq!(scheduler.live_handles(), 0);
    }

    #[test]
    fn countdown_tracks_wall_clock_at_the_scheduled_period() {
        for policy in [DriftPolicy::Decrement, DriftPolicy::Resync] {
            let (engine, clock, scheduler) = engine_at(10);
            let mut engine = engine.with_policy(policy);
            engine.initialize();
            let period = scheduler.last_period().unwrap();
            assert_eq!(period, Duration::from_secs(1));

            let step = ChronoDuration::from_std(period).unwrap();
            while engine.status() == TimerStatus::Running {
                clock.advance(step);
                engine.tick();
                assert_eq!(
                    engine.seconds_remaining(),
                    engine.target().seconds_until(clock.now())
                );
            }
            assert_eq!(clock.now(), engine.target().instant);
        }
    }
}

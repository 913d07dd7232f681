//! Tick scheduling port.
//!
//! The engine never sleeps or spawns anything itself. It asks a
//! [`TickScheduler`] for one recurring tick when it starts running and
//! cancels the returned handle when it stops. Who actually delivers the
//! ticks back to the engine is up to the driver:
//!
//! - [`IntervalScheduler`] spawns a tokio interval task and forwards each
//!   period onto a channel the driver awaits.
//! - [`ManualScheduler`] delivers nothing; tests call `tick()` themselves and
//!   inspect how many handles are alive.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Something that can start a recurring tick.
pub trait TickScheduler {
    type Handle: TickHandle;

    /// Start a tick repeating every `period`. The first tick fires one full
    /// period from now.
    fn schedule_every(&mut self, period: Duration) -> Self::Handle;
}

/// A live recurring tick. Cancelling must be idempotent.
pub trait TickHandle {
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

// ── tokio binding ──────────────────────────────────────────────────

/// Receiving end for ticks produced by an [`IntervalScheduler`].
pub type TickReceiver = mpsc::UnboundedReceiver<()>;

/// Production scheduler backed by `tokio::time::interval`.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    tx: mpsc::UnboundedSender<()>,
}

impl IntervalScheduler {
    pub fn new() -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[derive(Debug)]
pub struct IntervalHandle {
    task: Option<JoinHandle<()>>,
}

impl TickScheduler for IntervalScheduler {
    type Handle = IntervalHandle;

    fn schedule_every(&mut self, period: Duration) -> IntervalHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            // A late wakeup yields one tick, never a burst of catch-up ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        IntervalHandle { task: Some(task) }
    }
}

impl TickHandle for IntervalHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── manual binding ─────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ManualCounters {
    live: usize,
    created: usize,
    last_period: Option<Duration>,
}

/// Scheduler for tests and simulations: records handles, delivers nothing.
///
/// Clones share counters, so a test can keep one copy after giving the
/// other to an engine.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    counters: Rc<RefCell<ManualCounters>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles created and not yet cancelled.
    pub fn live_handles(&self) -> usize {
        self.counters.borrow().live
    }

    /// Handles created over the scheduler's lifetime.
    pub fn created_handles(&self) -> usize {
        self.counters.borrow().created
    }

    pub fn last_period(&self) -> Option<Duration> {
        self.counters.borrow().last_period
    }
}

#[derive(Debug)]
pub struct ManualHandle {
    counters: Rc<RefCell<ManualCounters>>,
    active: bool,
}

impl TickScheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule_every(&mut self, period: Duration) -> ManualHandle {
        {
            let mut counters = self.counters.borrow_mut();
            counters.live += 1;
            counters.created += 1;
            counters.last_period = Some(period);
        }
        ManualHandle {
            counters: Rc::clone(&self.counters),
            active: true,
        }
    }
}

impl TickHandle for ManualHandle {
    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.counters.borrow_mut().live -= 1;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimeParts, TimerStatus};

/// Every countdown transition produces an Event.
/// The CLI prints them as JSON; the session reacts to them with alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The engine entered `Running` with time still on the clock.
    CountdownStarted {
        seconds_remaining: u64,
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// One second elapsed and the countdown is still running.
    Tick {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// Seconds remaining reached zero. Emitted once per session.
    CountdownExpired {
        year: Option<i32>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        seconds_remaining: u64,
        time: TimeParts,
        celebration_active: bool,
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_expiry(&self) -> bool {
        matches!(self, Event::CountdownExpired { .. })
    }
}

//! One-way "celebration active" flag.
//!
//! Flipped exactly once when the countdown expires and never cleared for the
//! rest of the session. Presentational layers read it to switch from the
//! countdown view to the celebration view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrationController {
    activated_at: Option<DateTime<Utc>>,
}

impl CelebrationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }

    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// Returns `true` only for the call that actually switched the flag on.
    pub fn activate(&mut self, at: DateTime<Utc>) -> bool {
        if self.activated_at.is_some() {
            return false;
        }
        self.activated_at = Some(at);
        true
    }
}

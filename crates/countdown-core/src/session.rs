//! Countdown session.
//!
//! Wires the engine, the alert dispatcher and the settings store together:
//! engine events drive alerts, and the settings store feeds the alert policy
//! and the presentational view. The store never sees the engine.

use serde::Serialize;

use crate::alert::AlertDispatcher;
use crate::clock::Clock;
use crate::events::Event;
use crate::settings::{SettingsStore, Theme};
use crate::storage::KvStore;
use crate::target::TargetMoment;
use crate::timer::{CountdownEngine, TickScheduler, TimeParts, TimerStatus};
use crate::wishes::all_wishes;

/// Everything a presentational layer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct CountdownView {
    pub time: TimeParts,
    pub seconds_remaining: u64,
    pub status: TimerStatus,
    pub celebration_active: bool,
    pub target: TargetMoment,
    pub theme: &'static Theme,
    pub wishes: Vec<String>,
}

pub struct CountdownSession<S: TickScheduler, C: Clock, K: KvStore> {
    engine: CountdownEngine<S, C>,
    alerts: AlertDispatcher,
    settings: SettingsStore<K>,
}

impl<S: TickScheduler, C: Clock, K: KvStore> CountdownSession<S, C, K> {
    pub fn new(
        engine: CountdownEngine<S, C>,
        alerts: AlertDispatcher,
        settings: SettingsStore<K>,
    ) -> Self {
        Self {
            engine,
            alerts,
            settings,
        }
    }

    /// Initialize the engine. If the target has already passed, the expiry
    /// alert is dispatched right away.
    pub fn start(&mut self) -> Event {
        let event = self.engine.initialize();
        self.react(&event);
        event
    }

    /// Apply one tick and dispatch whatever alert it calls for.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick()?;
        self.react(&event);
        Some(event)
    }

    pub fn view(&self) -> CountdownView {
        let settings = self.settings.settings();
        CountdownView {
            time: self.engine.time_parts(),
            seconds_remaining: self.engine.seconds_remaining(),
            status: self.engine.status(),
            celebration_active: self.engine.celebration().is_active(),
            target: self.engine.target().clone(),
            theme: settings.theme(),
            wishes: all_wishes(&settings.custom_wishes),
        }
    }

    pub fn engine(&self) -> &CountdownEngine<S, C> {
        &self.engine
    }

    pub fn alerts(&self) -> &AlertDispatcher {
        &self.alerts
    }

    pub fn settings(&self) -> &SettingsStore<K> {
        &self.settings
    }

    /// Settings mutations go through the store; the next tick picks them up.
    pub fn settings_mut(&mut self) -> &mut SettingsStore<K> {
        &mut self.settings
    }

    /// Cancel the tick. Idempotent.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    fn react(&mut self, event: &Event) {
        let settings = self.settings.settings();
        match event {
            Event::Tick { .. } => {
                self.alerts.on_tick(settings);
            }
            Event::CountdownExpired { .. } => {
                self.alerts.on_expiry(settings);
            }
            Event::CountdownStarted { .. } | Event::StateSnapshot { .. } => {}
        }
    }
}

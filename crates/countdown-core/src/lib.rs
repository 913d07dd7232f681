//! # Countdown Core Library
//!
//! Core logic for the New Year countdown. The terminal front end in
//! `countdown-cli` is a thin presentational layer over this crate.
//!
//! ## Architecture
//!
//! - **Target**: resolves the instant to count down to, once per session
//! - **Timer Engine**: a two-state machine (`Running`, `Idle`) that owns its
//!   single recurring tick and detects expiry
//! - **Alerts**: maps ticks and expiry onto note requests, honouring mute and
//!   visibility
//! - **Settings**: typed user preferences persisted in a key-value store
//! - **Storage**: SQLite key-value store and TOML configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: countdown state machine
//! - [`CountdownSession`]: wires engine, alerts and settings together
//! - [`SettingsStore`]: settings persistence
//! - [`Config`]: application configuration management

pub mod alert;
pub mod celebration;
pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod settings;
pub mod storage;
pub mod target;
pub mod timer;
pub mod wishes;

pub use alert::{AlertDispatcher, AudioOutput, NoteRequest, Visibility, Waveform};
pub use celebration::CelebrationController;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AudioError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use session::{CountdownSession, CountdownView};
pub use settings::{Settings, SettingsStore, SoundTone, Theme, ThemeId};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use target::{resolve_target, TargetMoment, TargetSpec, TargetZone};
pub use timer::{
    CountdownEngine, CountdownState, DriftPolicy, IntervalScheduler, ManualScheduler,
    TickScheduler, TimeParts, TimerStatus,
};

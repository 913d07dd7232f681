mod engine;
mod format;
mod ticker;

pub use engine::{CountdownEngine, CountdownState, DriftPolicy, TimerStatus, DEFAULT_TICK_PERIOD};
pub use format::TimeParts;
pub use ticker::{
    IntervalHandle, IntervalScheduler, ManualHandle, ManualScheduler, TickHandle, TickReceiver,
    TickScheduler,
};

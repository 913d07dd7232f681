pub mod config;
pub mod run;
pub mod settings;
pub mod wish;

use std::time::Duration;

use clap::Args;
use countdown_core::{Config, Database, KvStore, MemoryStore, SettingsStore, TargetSpec, TargetZone};
use tracing::warn;

/// Options choosing what to count down to.
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Zone for New Year's midnight: "local" or an offset like "+07:00"
    #[arg(long)]
    pub zone: Option<String>,
    /// Count down to New Year of this year instead of the next one
    #[arg(long)]
    pub year: Option<i32>,
    /// Custom countdown: hours
    #[arg(long, conflicts_with_all = ["zone", "year"])]
    pub hours: Option<u64>,
    /// Custom countdown: minutes
    #[arg(long, conflicts_with_all = ["zone", "year"])]
    pub minutes: Option<u64>,
    /// Custom countdown: seconds
    #[arg(long, conflicts_with_all = ["zone", "year"])]
    pub seconds: Option<u64>,
}

impl TargetArgs {
    /// Command-line flags override the `[target]` config section.
    pub fn spec(&self, config: &Config) -> Result<TargetSpec, Box<dyn std::error::Error>> {
        if self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some() {
            let total = self
                .hours
                .unwrap_or(0)
                .saturating_mul(3600)
                .saturating_add(self.minutes.unwrap_or(0).saturating_mul(60))
                .saturating_add(self.seconds.unwrap_or(0));
            return Ok(TargetSpec::In(Duration::from_secs(total)));
        }

        let zone: TargetZone = match &self.zone {
            Some(zone) => zone.parse()?,
            None => config.target.zone.parse()?,
        };
        Ok(TargetSpec::NewYear {
            zone,
            year: self.year.or(config.target.year),
        })
    }
}

/// Open the settings database, falling back to an in-memory store so the
/// countdown still runs when the data directory is unusable.
pub fn open_settings() -> SettingsStore<Box<dyn KvStore>> {
    let kv: Box<dyn KvStore> = match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            warn!(error = %e, "settings database unavailable, changes will not persist");
            Box::new(MemoryStore::new())
        }
    };
    SettingsStore::load(kv)
}

/// Like [`open_settings`], but fails when the database cannot be opened.
/// Used by commands whose whole point is to persist something.
pub fn open_settings_strict() -> Result<SettingsStore<Database>, Box<dyn std::error::Error>> {
    Ok(SettingsStore::load(Database::open()?))
}

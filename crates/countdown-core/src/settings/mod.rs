//! User preferences.
//!
//! [`Settings`] is the typed in-memory shape; [`SettingsStore`] owns the
//! only instance and maps it onto string keys in a [`KvStore`]. The two are
//! kept apart so the storage encoding can change without touching callers.
//!
//! [`KvStore`]: crate::storage::KvStore

mod store;
mod theme;

pub use store::{keys, SettingsStore};
pub use theme::{Theme, ThemeId, THEMES};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Alert motif played when the countdown reaches zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundTone {
    #[default]
    Beep,
    Bell,
    Chime,
}

impl SoundTone {
    pub const ALL: [SoundTone; 3] = [SoundTone::Beep, SoundTone::Bell, SoundTone::Chime];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundTone::Beep => "beep",
            SoundTone::Bell => "bell",
            SoundTone::Chime => "chime",
        }
    }
}

impl fmt::Display for SoundTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundTone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundTone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownTone(s.to_string()))
    }
}

/// User preference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub ticking_sound_enabled: bool,
    #[serde(default)]
    pub sound_tone: SoundTone,
    #[serde(default)]
    pub theme: ThemeId,
    #[serde(default)]
    pub custom_wishes: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            ticking_sound_enabled: false,
            sound_tone: SoundTone::Beep,
            theme: ThemeId::Default,
            custom_wishes: Vec::new(),
        }
    }
}

impl Settings {
    pub fn theme(&self) -> &'static Theme {
        self.theme.theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.sound_enabled);
        assert!(!settings.ticking_sound_enabled);
        assert_eq!(settings.sound_tone, SoundTone::Beep);
        assert_eq!(settings.theme, ThemeId::Default);
        assert!(settings.custom_wishes.is_empty());
    }

    #[test]
    fn tone_parsing() {
        assert_eq!("Chime".parse::<SoundTone>().unwrap(), SoundTone::Chime);
        assert_eq!(" bell ".parse::<SoundTone>().unwrap(), SoundTone::Bell);
        assert!("gong".parse::<SoundTone>().is_err());
    }
}

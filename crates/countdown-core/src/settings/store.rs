//! Settings persistence.
//!
//! Each field is stored under its own key so that one corrupt value only
//! resets that field. Reads never fail the caller: missing or malformed
//! values fall back to the field's default and a warning is logged.

use tracing::warn;

use super::{Settings, SoundTone, ThemeId};
use crate::error::Result;
use crate::storage::KvStore;

/// Storage keys.
pub mod keys {
    pub const THEME: &str = "theme";
    pub const CUSTOM_WISHES: &str = "custom-wishes";
    pub const SOUND_ENABLED: &str = "sound-enabled";
    pub const TICKING_SOUND_ENABLED: &str = "ticking-sound-enabled";
    pub const SOUND_TONE: &str = "sound-tone";
}

/// Sole owner of the user's [`Settings`].
///
/// Every mutator applies the change in memory and then writes the full
/// settings record before returning. A failed write is reported but the
/// in-memory change stands, so the session keeps the user's choice.
pub struct SettingsStore<K: KvStore> {
    kv: K,
    settings: Settings,
}

impl<K: KvStore> SettingsStore<K> {
    /// Load settings from `kv`, substituting defaults where needed.
    pub fn load(kv: K) -> Self {
        let settings = decode(&kv);
        Self { kv, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Result<()> {
        self.settings.sound_enabled = enabled;
        self.save()
    }

    pub fn set_ticking_enabled(&mut self, enabled: bool) -> Result<()> {
        self.settings.ticking_sound_enabled = enabled;
        self.save()
    }

    pub fn set_tone(&mut self, tone: SoundTone) -> Result<()> {
        self.settings.sound_tone = tone;
        self.save()
    }

    pub fn set_theme(&mut self, theme: ThemeId) -> Result<()> {
        self.settings.theme = theme;
        self.save()
    }

    /// Append a custom wish. Blank input is ignored and nothing is written.
    pub fn add_wish(&mut self, wish: &str) -> Result<&[String]> {
        let wish = wish.trim();
        if wish.is_empty() {
            return Ok(&self.settings.custom_wishes);
        }
        self.settings.custom_wishes.push(wish.to_string());
        self.save()?;
        Ok(&self.settings.custom_wishes)
    }

    /// Remove the custom wish at `index`. Out of range is a no-op.
    pub fn delete_wish(&mut self, index: usize) -> Result<&[String]> {
        if index >= self.settings.custom_wishes.len() {
            return Ok(&self.settings.custom_wishes);
        }
        self.settings.custom_wishes.remove(index);
        self.save()?;
        Ok(&self.settings.custom_wishes)
    }

    /// Write every field to storage.
    pub fn save(&mut self) -> Result<()> {
        for (key, value) in encode(&self.settings)? {
            self.kv.set(key, &value)?;
        }
        Ok(())
    }
}

fn encode(settings: &Settings) -> Result<[(&'static str, String); 5]> {
    Ok([
        (keys::THEME, settings.theme.as_str().to_string()),
        (
            keys::CUSTOM_WISHES,
            serde_json::to_string(&settings.custom_wishes)?,
        ),
        (keys::SOUND_ENABLED, settings.sound_enabled.to_string()),
        (
            keys::TICKING_SOUND_ENABLED,
            settings.ticking_sound_enabled.to_string(),
        ),
        (keys::SOUND_TONE, settings.sound_tone.as_str().to_string()),
    ])
}

fn decode<K: KvStore>(kv: &K) -> Settings {
    let defaults = Settings::default();
    Settings {
        theme: read_field(kv, keys::THEME, |raw| raw.parse().ok()).unwrap_or(defaults.theme),
        custom_wishes: read_field(kv, keys::CUSTOM_WISHES, |raw| {
            serde_json::from_str::<Vec<String>>(raw).ok()
        })
        .unwrap_or(defaults.custom_wishes),
        sound_enabled: read_field(kv, keys::SOUND_ENABLED, |raw| raw.parse().ok())
            .unwrap_or(defaults.sound_enabled),
        ticking_sound_enabled: read_field(kv, keys::TICKING_SOUND_ENABLED, |raw| {
            raw.parse().ok()
        })
        .unwrap_or(defaults.ticking_sound_enabled),
        sound_tone: read_field(kv, keys::SOUND_TONE, |raw| raw.parse().ok())
            .unwrap_or(defaults.sound_tone),
    }
}

fn read_field<K, T>(kv: &K, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T>
where
    K: KvStore,
{
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read setting, using default");
            return None;
        }
    };
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!(key, value = %raw, "malformed setting, using default");
    }
    parsed
}

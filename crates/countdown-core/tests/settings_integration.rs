//! Integration tests for settings persisted through SQLite.

use countdown_core::settings::keys;
use countdown_core::{Database, KvStore, SettingsStore, SoundTone, ThemeId};

#[test]
fn test_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("countdown.db");

    {
        let mut store = SettingsStore::load(Database::open_at(&path).unwrap());
        store.set_theme(ThemeId::NeonDream).unwrap();
        store.set_tone(SoundTone::Chime).unwrap();
        store.set_ticking_enabled(true).unwrap();
        store.add_wish("Peace").unwrap();
        store.add_wish("Joy").unwrap();
        store.delete_wish(0).unwrap();
    }

    let store = SettingsStore::load(Database::open_at(&path).unwrap());
    let settings = store.settings();
    assert_eq!(settings.theme, ThemeId::NeonDream);
    assert_eq!(settings.sound_tone, SoundTone::Chime);
    assert!(settings.ticking_sound_enabled);
    assert!(settings.sound_enabled);
    assert_eq!(settings.custom_wishes, vec!["Joy".to_string()]);
}

#[test]
fn test_malformed_rows_fall_back_to_defaults() {
    let mut db = Database::open_memory().unwrap();
    db.set(keys::CUSTOM_WISHES, "[1, 2").unwrap();
    db.set(keys::THEME, "tartan").unwrap();
    db.set(keys::SOUND_ENABLED, "yes please").unwrap();

    let store = SettingsStore::load(db);
    let settings = store.settings();
    assert!(settings.custom_wishes.is_empty());
    assert_eq!(settings.theme, ThemeId::Default);
    assert!(settings.sound_enabled);
}

#[test]
fn test_wish_list_is_stored_as_json_array() {
    let mut store = SettingsStore::load(Database::open_memory().unwrap());
    store.add_wish("Happy \"2026\"").unwrap();
    let raw = store.kv().get(keys::CUSTOM_WISHES).unwrap().unwrap();
    let decoded: Vec<String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded, vec!["Happy \"2026\"".to_string()]);
}

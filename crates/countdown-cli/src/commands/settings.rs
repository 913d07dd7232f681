use clap::{Subcommand, ValueEnum};
use countdown_core::settings::THEMES;
use countdown_core::{SoundTone, ThemeId};

use super::{open_settings, open_settings_strict};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn alert sounds on or off
    Sound { state: Toggle },
    /// Turn the per-second ticking sound on or off
    Ticking { state: Toggle },
    /// Choose the alert tone (beep, bell, chime)
    Tone { tone: SoundTone },
    /// Choose the colour theme by id or name
    Theme { theme: ThemeId },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Show { json } => {
            let store = open_settings();
            let settings = store.settings();
            if json {
                println!("{}", serde_json::to_string_pretty(settings)?);
            } else {
                let on_off = |b: bool| if b { "on" } else { "off" };
                println!("sound:   {}", on_off(settings.sound_enabled));
                println!("ticking: {}", on_off(settings.ticking_sound_enabled));
                println!("tone:    {}", settings.sound_tone);
                println!("theme:   {} ({})", settings.theme().name, settings.theme);
                println!("wishes:  {} custom", settings.custom_wishes.len());
            }
        }
        SettingsAction::Sound { state } => {
            open_settings_strict()?.set_sound_enabled(state.enabled())?;
            println!("ok");
        }
        SettingsAction::Ticking { state } => {
            open_settings_strict()?.set_ticking_enabled(state.enabled())?;
            println!("ok");
        }
        SettingsAction::Tone { tone } => {
            open_settings_strict()?.set_tone(tone)?;
            println!("ok");
        }
        SettingsAction::Theme { theme } => {
            open_settings_strict()?.set_theme(theme)?;
            println!("ok");
        }
    }
    Ok(())
}

/// Print the theme catalog, marking the active one.
pub fn list_themes() -> Result<(), Box<dyn std::error::Error>> {
    let current = open_settings().settings().theme;
    for theme in &THEMES {
        let marker = if theme.id == current { "*" } else { " " };
        println!("{marker} {:<16} {}", theme.id.as_str(), theme.name);
    }
    Ok(())
}

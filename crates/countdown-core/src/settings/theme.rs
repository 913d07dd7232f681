use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeId {
    #[default]
    Default,
    FierySunset,
    ElectricSpring,
    RoyalTwilight,
    CrimsonPassion,
    MysticOcean,
    NeonDream,
}

/// Visual theme descriptor. The set is fixed at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    /// Background gradient, as presentation-layer class tokens.
    pub background: &'static str,
    /// Accent colour token used for headings and the running glow.
    pub accent: &'static str,
    pub button: &'static str,
}

pub static THEMES: [Theme; 7] = [
    Theme {
        id: ThemeId::Default,
        name: "Midnight Sky",
        background: "bg-gradient-to-br from-slate-900 via-indigo-950 to-slate-800",
        accent: "text-cyan-300",
        button: "bg-cyan-500 hover:bg-cyan-400 text-slate-900",
    },
    Theme {
        id: ThemeId::FierySunset,
        name: "Fiery Sunset",
        background: "bg-gradient-to-br from-amber-500 via-red-500 to-violet-600",
        accent: "text-amber-300",
        button: "bg-amber-400 hover:bg-amber-300 text-slate-900",
    },
    Theme {
        id: ThemeId::ElectricSpring,
        name: "Electric Spring",
        background: "bg-gradient-to-br from-yellow-300 via-green-400 to-cyan-500",
        accent: "text-yellow-200",
        button: "bg-yellow-300 hover:bg-yellow-200 text-slate-900",
    },
    Theme {
        id: ThemeId::RoyalTwilight,
        name: "Royal Twilight",
        background: "bg-gradient-to-br from-indigo-700 via-fuchsia-600 to-orange-500",
        accent: "text-fuchsia-400",
        button: "bg-fuchsia-500 hover:bg-fuchsia-400 text-white",
    },
    Theme {
        id: ThemeId::CrimsonPassion,
        name: "Crimson Passion",
        background: "bg-gradient-to-br from-orange-500 via-red-600 to-pink-600",
        accent: "text-red-300",
        button: "bg-red-400 hover:bg-red-300 text-white",
    },
    Theme {
        id: ThemeId::MysticOcean,
        name: "Mystic Ocean",
        background: "bg-gradient-to-br from-rose-700 via-purple-700 to-indigo-600",
        accent: "text-purple-300",
        button: "bg-purple-500 hover:bg-purple-400 text-white",
    },
    Theme {
        id: ThemeId::NeonDream,
        name: "Neon Dream",
        background: "bg-gradient-to-br from-sky-400 via-blue-600 to-fuchsia-500",
        accent: "text-sky-300",
        button: "bg-sky-400 hover:bg-sky-300 text-slate-900",
    },
];

impl ThemeId {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Default => "default",
            ThemeId::FierySunset => "fierySunset",
            ThemeId::ElectricSpring => "electricSpring",
            ThemeId::RoyalTwilight => "royalTwilight",
            ThemeId::CrimsonPassion => "crimsonPassion",
            ThemeId::MysticOcean => "mysticOcean",
            ThemeId::NeonDream => "neonDream",
        }
    }

    pub fn theme(self) -> &'static Theme {
        // THEMES is declared in enum order.
        &THEMES[self as usize]
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = ValidationError;

    /// Accepts either the id (`neonDream`) or the display name (`Neon Dream`),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        THEMES
            .iter()
            .find(|t| t.id.as_str().eq_ignore_ascii_case(wanted) || t.name.eq_ignore_ascii_case(wanted))
            .map(|t| t.id)
            .ok_or_else(|| ValidationError::UnknownTheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_in_enum_order() {
        for (i, theme) in THEMES.iter().enumerate() {
            assert_eq!(theme.id as usize, i);
            assert_eq!(theme.id.theme(), theme);
        }
    }

    #[test]
    fn parse_by_id_or_name() {
        assert_eq!("neonDream".parse::<ThemeId>().unwrap(), ThemeId::NeonDream);
        assert_eq!("mystic ocean".parse::<ThemeId>().unwrap(), ThemeId::MysticOcean);
        assert!("plaid".parse::<ThemeId>().is_err());
    }

    #[test]
    fn serde_uses_ids() {
        assert_eq!(
            serde_json::to_string(&ThemeId::FierySunset).unwrap(),
            "\"fierySunset\""
        );
    }
}

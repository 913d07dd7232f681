//! Wishes shown floating behind the celebration view.

/// Built-in wishes. Always shown, never persisted, never deletable.
pub const BUILTIN_WISHES: &[&str] = &[
    "Happy New Year!",
    "May your year be full of joy",
    "Health and happiness to you and yours",
    "New year, new adventures",
    "Wishing you peace and prosperity",
    "May all your dreams come true",
    "Cheers to a fresh start",
    "Love, laughter and light",
    "Here's to twelve months of good luck",
    "Make every day count",
];

/// Built-in wishes followed by the user's custom ones.
pub fn all_wishes(custom: &[String]) -> Vec<String> {
    BUILTIN_WISHES
        .iter()
        .map(|w| (*w).to_string())
        .chain(custom.iter().cloned())
        .collect()
}

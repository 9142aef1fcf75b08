use std::collections::HashMap;

use crate::models::settings::{Settings, ThemePreference};

pub(crate) const THEME_KEY: &str = "theme_preference";
pub(crate) const LANGUAGE_KEY: &str = "language_preference";
pub(crate) const ONBOARDING_COMPLETED_KEY: &str = "onboarding_completed";

/// Build settings from stored key/value pairs, defaulting anything missing.
pub fn pairs_to_settings(pairs: &HashMap<String, String>) -> Settings {
    let defaults = Settings::default();

    Settings {
        theme: pairs
            .get(THEME_KEY)
            .map(|v| ThemePreference::parse(v))
            .unwrap_or(defaults.theme),
        language: pairs
            .get(LANGUAGE_KEY)
            .cloned()
            .unwrap_or(defaults.language),
        onboarding_completed: pairs
            .get(ONBOARDING_COMPLETED_KEY)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.onboarding_completed),
    }
}

pub fn settings_to_pairs(settings: &Settings) -> [(&'static str, String); 3] {
    [
        (THEME_KEY, settings.theme.as_str().to_string()),
        (LANGUAGE_KEY, settings.language.clone()),
        (
            ONBOARDING_COMPLETED_KEY,
            if settings.onboarding_completed { "1" } else { "0" }.to_string(),
        ),
    ]
}

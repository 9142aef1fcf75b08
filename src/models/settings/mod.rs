// Settings module
// User preferences and the startup gate derived from them

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    /// Parse a stored preference. Unknown values fall back to `System`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "LIGHT" => Self::Light,
            "DARK" => Self::Dark,
            _ => Self::System,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "LIGHT",
            Self::Dark => "DARK",
            Self::System => "SYSTEM",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: ThemePreference,
    pub language: String,
    pub onboarding_completed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            language: "English".to_string(),
            onboarding_completed: false,
        }
    }
}

/// Where the app lands when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupRoute {
    Onboarding,
    Home,
}

impl StartupRoute {
    pub fn for_settings(settings: &Settings) -> Self {
        if settings.onboarding_completed {
            Self::Home
        } else {
            Self::Onboarding
        }
    }
}

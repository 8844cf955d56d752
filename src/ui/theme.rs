use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;

/// Cosmetic display mode. Independent of the conversation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Dark,
    Light,
}

impl DisplayMode {
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Dark => DisplayMode::Light,
            DisplayMode::Light => DisplayMode::Dark,
        }
    }

    /// Label of the button that switches away from the current mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            DisplayMode::Dark => "Switch to Light Mode",
            DisplayMode::Light => "Switch to Dark Mode",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Dark => write!(f, "dark"),
            DisplayMode::Light => write!(f, "light"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseDisplayModeError {
    message: String,
}

impl fmt::Display for ParseDisplayModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseDisplayModeError {}

impl FromStr for DisplayMode {
    type Err = ParseDisplayModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(DisplayMode::Dark),
            "light" => Ok(DisplayMode::Light),
            _ =>
                Err(ParseDisplayModeError {
                    message: format!("Invalid display mode: '{}'", s),
                }),
        }
    }
}

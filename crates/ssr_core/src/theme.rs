//! Theme preference resolved per request.
//!
//! The theme is read once when a request starts and stays fixed for that
//! request, so concurrent requests never observe each other's preference.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SsrCoreError;

/// Name of the cookie carrying the client's theme preference.
pub const THEME_COOKIE: &str = "theme";

/// Color theme written to the root `data-theme` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Attribute value for this theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Theme named by a preference value, `None` when unrecognized.
    pub fn from_preference(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SsrCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(SsrCoreError::InvalidTheme(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let result = "solarized".parse::<Theme>();
        assert_eq!(
            result,
            Err(SsrCoreError::InvalidTheme("solarized".to_string()))
        );
    }

    #[test]
    fn test_from_preference_ignores_garbage() {
        assert_eq!(Theme::from_preference("DARK"), Some(Theme::Dark));
        assert_eq!(Theme::from_preference("<script>"), None);
        assert_eq!(Theme::from_preference(""), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Theme::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
    }
}

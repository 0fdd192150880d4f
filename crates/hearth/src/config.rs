use std::env;

use hearth_ssr::{AssemblerConfig, RenderMode, SsrCoreError, Theme};

/// Rendering configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Rendering strategy (default: streaming)
    pub render_mode: RenderMode,
    /// Crawler settlement timeout in milliseconds (default: 5,000)
    pub bot_timeout_ms: u64,
    /// Theme for requests without a preference (default: light)
    pub default_theme: Theme,
    /// Renderer event channel capacity (default: 64)
    pub channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SSR_MODE` - `streaming` or `buffered` (default: streaming)
    /// - `SSR_BOT_TIMEOUT_MS` - Crawler settlement timeout (default: 5,000)
    /// - `SSR_DEFAULT_THEME` - `light` or `dark` (default: light)
    /// - `SSR_CHANNEL_CAPACITY` - Renderer event buffer (default: 64)
    pub fn from_env() -> Result<Self, SsrCoreError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparseable numbers fall back to their defaults; unknown mode or
    /// theme names are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SsrCoreError> {
        let render_mode = match lookup("SSR_MODE") {
            Some(value) => value.parse()?,
            None => RenderMode::default(),
        };
        let default_theme = match lookup("SSR_DEFAULT_THEME") {
            Some(value) => value.parse()?,
            None => Theme::default(),
        };

        Ok(Self {
            render_mode,
            bot_timeout_ms: lookup("SSR_BOT_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(AssemblerConfig::DEFAULT_BOT_TIMEOUT_MS),
            default_theme,
            channel_capacity: lookup("SSR_CHANNEL_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(AssemblerConfig::DEFAULT_CHANNEL_CAPACITY),
        })
    }

    /// Validate into the assembler's configuration.
    pub fn assembler_config(&self) -> Result<AssemblerConfig, SsrCoreError> {
        AssemblerConfig::new(
            self.render_mode,
            self.bot_timeout_ms,
            self.default_theme,
            self.channel_capacity,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.render_mode, RenderMode::Streaming);
        assert_eq!(config.bot_timeout_ms, 5_000);
        assert_eq!(config.default_theme, Theme::Light);
        assert_eq!(config.channel_capacity, 64);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SSR_MODE", "buffered"),
            ("SSR_BOT_TIMEOUT_MS", "1500"),
            ("SSR_DEFAULT_THEME", "dark"),
            ("SSR_CHANNEL_CAPACITY", "16"),
        ]))
        .unwrap();

        let assembler = config.assembler_config().unwrap();
        assert_eq!(assembler.mode, RenderMode::Buffered);
        assert_eq!(assembler.bot_timeout_ms, 1_500);
        assert_eq!(assembler.default_theme, Theme::Dark);
        assert_eq!(assembler.channel_capacity, 16);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = Config::from_lookup(lookup(&[("SSR_BOT_TIMEOUT_MS", "soon")])).unwrap();
        assert_eq!(config.bot_timeout_ms, 5_000);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = Config::from_lookup(lookup(&[("SSR_MODE", "pipeable")]));
        assert!(matches!(result, Err(SsrCoreError::InvalidMode(_))));
    }

    #[test]
    fn test_zero_timeout_rejected_on_validation() {
        let config = Config::from_lookup(lookup(&[("SSR_BOT_TIMEOUT_MS", "0")])).unwrap();
        assert!(matches!(
            config.assembler_config(),
            Err(SsrCoreError::InvalidTimeout { .. })
        ));
    }
}

//! Configuration types for document assembly with validation.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SsrCoreError, MAX_BOT_TIMEOUT_MS},
    theme::Theme,
};

/// Rendering strategy for a deployment.
///
/// Chosen once from configuration; the assembler never switches strategy
/// per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Incremental render, the shell is sent as soon as it is ready.
    #[default]
    Streaming,
    /// Full render to a string, one complete response.
    Buffered,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Streaming => "streaming",
            RenderMode::Buffered => "buffered",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = SsrCoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "streaming" | "stream" => Ok(RenderMode::Streaming),
            "buffered" | "string" => Ok(RenderMode::Buffered),
            _ => Err(SsrCoreError::InvalidMode(s.to_string())),
        }
    }
}

/// Configuration for the response assembler (validated).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssemblerConfig {
    /// Rendering strategy.
    pub mode: RenderMode,
    /// How long crawler requests wait for full settlement, in milliseconds.
    pub bot_timeout_ms: u64,
    /// Theme used when the request carries no preference.
    pub default_theme: Theme,
    /// Buffer size of the renderer event channel.
    pub channel_capacity: usize,
}

impl AssemblerConfig {
    /// Default crawler settlement timeout (5s).
    pub const DEFAULT_BOT_TIMEOUT_MS: u64 = 5_000;
    /// Default renderer event channel capacity.
    pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

    /// Create and validate assembler config.
    pub fn new(
        mode: RenderMode,
        bot_timeout_ms: u64,
        default_theme: Theme,
        channel_capacity: usize,
    ) -> Result<Self> {
        if bot_timeout_ms == 0 || bot_timeout_ms > MAX_BOT_TIMEOUT_MS {
            return Err(SsrCoreError::InvalidTimeout {
                got: bot_timeout_ms,
                max: MAX_BOT_TIMEOUT_MS,
            });
        }
        if channel_capacity == 0 {
            return Err(SsrCoreError::InvalidChannelCapacity);
        }

        Ok(Self {
            mode,
            bot_timeout_ms,
            default_theme,
            channel_capacity,
        })
    }

    /// Create with defaults (5s crawler timeout, light theme, 64 events buffered).
    pub fn with_defaults(mode: RenderMode) -> Self {
        Self {
            mode,
            bot_timeout_ms: Self::DEFAULT_BOT_TIMEOUT_MS,
            default_theme: Theme::default(),
            channel_capacity: Self::DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Crawler settlement timeout as a Duration.
    pub fn bot_timeout(&self) -> Duration {
        Duration::from_millis(self.bot_timeout_ms)
    }
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self::with_defaults(RenderMode::default())
    }
}

//! Core SSR error types (pure - no I/O variants).

use thiserror::Error;

/// Upper bound for the crawler settlement timeout (60s).
pub const MAX_BOT_TIMEOUT_MS: u64 = 60_000;

/// Core SSR errors (pure - no I/O variants).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SsrCoreError {
    #[error("Bot settlement timeout must be between 1 and {max}ms, got {got}ms")]
    InvalidTimeout { got: u64, max: u64 },

    #[error("Render channel capacity must be at least 1")]
    InvalidChannelCapacity,

    #[error("Unknown theme: {0}")]
    InvalidTheme(String),

    #[error("Unknown render mode: {0}")]
    InvalidMode(String),
}

pub type Result<T> = std::result::Result<T, SsrCoreError>;

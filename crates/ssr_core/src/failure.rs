//! Pure mapping from fatal render outcomes to HTTP responses.
//!
//! Every fatal condition becomes a complete static document so nothing but
//! well-formed HTML ever reaches the network.

use crate::document::{SERVER_ERROR_PAGE, TIMEOUT_PAGE, UNAVAILABLE_PAGE};

/// Fatal outcomes of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFailure {
    /// The renderer could not produce the shell.
    Shell,
    /// A crawler render did not settle in time.
    SettlementTimeout,
    /// The renderer cannot serve the configured mode.
    Unavailable,
}

impl RenderFailure {
    /// HTTP status code for the failure.
    ///
    /// - `Shell` -> 500 (Internal Server Error)
    /// - `SettlementTimeout` -> 504 (Gateway Timeout)
    /// - `Unavailable` -> 500 (Internal Server Error)
    pub fn status_code(&self) -> u16 {
        match self {
            RenderFailure::Shell => 500,
            RenderFailure::SettlementTimeout => 504,
            RenderFailure::Unavailable => 500,
        }
    }

    /// Static body served for the failure. Never contains error details.
    pub fn page(&self) -> &'static str {
        match self {
            RenderFailure::Shell => SERVER_ERROR_PAGE,
            RenderFailure::SettlementTimeout => TIMEOUT_PAGE,
            RenderFailure::Unavailable => UNAVAILABLE_PAGE,
        }
    }
}

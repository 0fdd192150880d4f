//! SSR errors including render lifecycle failures.

use hearth_ssr_core::{RenderFailure, RenderMode, SsrCoreError};
use thiserror::Error;

use crate::session::RenderError;

/// SSR errors including render lifecycle failures.
#[derive(Error, Debug)]
pub enum SsrError {
    #[error("Core error: {0}")]
    Core(#[from] SsrCoreError),

    #[error("Shell render failed: {0}")]
    Shell(RenderError),

    #[error("Render did not settle within {0}ms")]
    SettlementTimeout(u64),

    #[error("Renderer does not support {0} rendering")]
    Unsupported(RenderMode),

    #[error("Render cancelled by client")]
    Cancelled,
}

impl SsrError {
    /// The client-facing failure for this error.
    ///
    /// `None` for cancellation, where nobody is left to receive a response,
    /// and for configuration errors, which never happen per request.
    pub fn failure(&self) -> Option<RenderFailure> {
        match self {
            SsrError::Shell(_) => Some(RenderFailure::Shell),
            SsrError::SettlementTimeout(_) => Some(RenderFailure::SettlementTimeout),
            SsrError::Unsupported(_) => Some(RenderFailure::Unavailable),
            SsrError::Cancelled | SsrError::Core(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SsrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_mapping() {
        let shell = SsrError::Shell(RenderError::new("boom"));
        assert_eq!(shell.failure(), Some(RenderFailure::Shell));
        assert_eq!(
            SsrError::SettlementTimeout(5_000).failure(),
            Some(RenderFailure::SettlementTimeout)
        );
        assert_eq!(
            SsrError::Unsupported(RenderMode::Streaming).failure(),
            Some(RenderFailure::Unavailable)
        );
        assert_eq!(SsrError::Cancelled.failure(), None);
    }

    #[test]
    fn test_display_does_not_need_details() {
        let err = SsrError::SettlementTimeout(5_000);
        assert_eq!(err.to_string(), "Render did not settle within 5000ms");
    }
}

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hearth_ssr::{failure_response, RenderFailure, SsrError};

use super::document::Document;

/// Non-standard status for requests whose client went away.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Render failure converted into a static document.
///
/// Details are logged; the client only ever sees the generic page.
pub struct DocumentError(pub SsrError);

impl IntoResponse for DocumentError {
    fn into_response(self) -> Response {
        if matches!(self.0, SsrError::Cancelled) {
            tracing::debug!("Client went away before the document was ready");
            let status = StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                .unwrap_or(StatusCode::BAD_REQUEST);
            return (status, Body::empty()).into_response();
        }

        let failure = self.0.failure().unwrap_or(RenderFailure::Shell);
        tracing::error!(
            error = %self.0,
            status = failure.status_code(),
            "Document render failed"
        );

        Document(failure_response(failure)).into_response()
    }
}

impl From<SsrError> for DocumentError {
    fn from(err: SsrError) -> Self {
        Self(err)
    }
}

//! Document handler: every page route renders through the assembler.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use futures_util::StreamExt;
use hearth_ssr::{DocumentBody, RenderRequest, ResponseMeta, Theme, THEME_COOKIE};

use super::error::DocumentError;
use crate::state::AppState;

/// An assembled document as an axum response.
pub struct Document(pub axum::http::Response<DocumentBody>);

impl IntoResponse for Document {
    fn into_response(self) -> Response {
        let (parts, body) = self.0.into_parts();
        let body = match body {
            DocumentBody::Complete(bytes) => Body::from(bytes),
            DocumentBody::Streaming(stream) => Body::from_stream(stream.map(Ok::<_, Infallible>)),
        };
        Response::from_parts(parts, body)
    }
}

/// Theme preference from the `theme` cookie, if it names a known theme.
fn theme_preference(headers: &HeaderMap) -> Option<Theme> {
    CookieJar::from_headers(headers)
        .get(THEME_COOKIE)
        .and_then(|cookie| Theme::from_preference(cookie.value_trimmed()))
}

/// GET /{*path} - Server-render the page at `path`.
///
/// Unknown paths render the not-found page with a 404 status.
/// The cancel signal carries server shutdown; a client disconnect drops the
/// response future or body stream, which drops the render session and aborts
/// the render.
pub async fn render_document(State(state): State<AppState>, request: Request) -> Response {
    let (parts, _body) = request.into_parts();

    let status = if state.pages.contains(parts.uri.path()) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    let mut render_request =
        RenderRequest::from_parts(&parts).with_cancel(state.subscribe_shutdown());
    if let Some(theme) = theme_preference(&parts.headers) {
        render_request = render_request.with_theme(theme);
    }
    let meta = ResponseMeta::new(status, HeaderMap::new());

    match state.assembler.assemble(render_request, meta).await {
        Ok(response) => Document(response).into_response(),
        Err(e) => DocumentError::from(e).into_response(),
    }
}

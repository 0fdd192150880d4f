//! Per-request inputs: the inbound request, its cancellation signal and the
//! caller-owned response metadata.

use hearth_ssr_core::{Theme, DOCUMENT_HEADERS};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use tokio::sync::watch;

/// Fires when the client behind a request goes away.
///
/// Cloning yields another observer of the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolve once the signal fires. Pends forever if it never can.
    pub async fn cancelled(&mut self) {
        if let Some(rx) = self.rx.as_mut() {
            let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
            if !closed {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}

/// Owner side of a [`CancelSignal`].
#[derive(Debug)]
pub struct Canceller {
    tx: watch::Sender<bool>,
}

impl Canceller {
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelSignal { rx: Some(rx) })
    }

    /// Another observer of this canceller's signal.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Inbound request as seen by the assembler.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    theme: Option<Theme>,
    cancel: CancelSignal,
}

impl RenderRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            theme: None,
            cancel: CancelSignal::never(),
        }
    }

    /// Build from the head of an `http` request.
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
    }

    /// Attach the client cancellation signal.
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Set the theme preference the client sent with this request.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path and query, as handed to the component tree.
    pub fn url(&self) -> &str {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    }

    /// `User-Agent` header, empty when missing or not valid text.
    pub fn user_agent(&self) -> &str {
        self.header_str(header::USER_AGENT).unwrap_or("")
    }

    /// The theme snapshot for this request.
    pub fn resolve_theme(&self, default: Theme) -> Theme {
        self.theme.unwrap_or(default)
    }

    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    fn header_str(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Caller-owned status and headers, augmented in place by the assembler.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    /// Set the document content type and cross-origin isolation headers.
    ///
    /// Existing values for these names are replaced; every other caller
    /// header is kept.
    pub fn apply_document_headers(&mut self) {
        for (name, value) in DOCUMENT_HEADERS {
            self.headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
    }
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self::new(StatusCode::OK, HeaderMap::new())
    }
}

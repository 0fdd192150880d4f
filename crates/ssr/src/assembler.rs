//! Response assembly.
//!
//! Turns a renderer's lifecycle events into an HTTP response: a streamed
//! document for browsers, a fully settled one for crawlers, or a complete
//! string render when the deployment is configured for buffered mode.

use std::{collections::VecDeque, sync::Arc};

use bytes::{Bytes, BytesMut};
use futures_util::{stream::BoxStream, StreamExt};
use hearth_ssr_core::{
    AssemblerConfig, BotClassifier, DocumentShell, RenderFailure, RenderMode, UserAgentClassifier,
};
use http::{header, HeaderValue, Response, StatusCode};

use crate::{
    adapter::{HeadCollector, RendererAdapter},
    body::DocumentBody,
    error::{Result, SsrError},
    request::{CancelSignal, RenderRequest, ResponseMeta},
    session::{RenderError, RenderEvent, RenderSession},
};

/// Events collected before a response could be produced.
#[derive(Debug, Default)]
struct Collected {
    chunks: Vec<Bytes>,
    errors: usize,
    shell_ready: bool,
    finished: bool,
}

enum Step {
    Cancelled,
    Event(Option<RenderEvent>),
}

/// Assembles document responses for one deployment.
pub struct ResponseAssembler {
    renderer: Arc<dyn RendererAdapter>,
    head: Arc<dyn HeadCollector>,
    bots: Arc<dyn BotClassifier>,
    config: AssemblerConfig,
}

impl ResponseAssembler {
    /// Create an assembler.
    ///
    /// Fails with [`SsrError::Unsupported`] when the renderer cannot serve
    /// the configured mode, so misconfigured deployments never take traffic.
    pub fn new(
        config: AssemblerConfig,
        renderer: Arc<dyn RendererAdapter>,
        head: Arc<dyn HeadCollector>,
    ) -> Result<Self> {
        if !renderer.supports(config.mode) {
            tracing::error!(mode = %config.mode, "Renderer does not support the configured mode");
            return Err(SsrError::Unsupported(config.mode));
        }

        if config.mode == RenderMode::Buffered {
            tracing::warn!("Streaming render disabled, documents are rendered to a string");
        }

        tracing::info!(
            mode = %config.mode,
            bot_timeout_ms = config.bot_timeout_ms,
            default_theme = %config.default_theme,
            "Response assembler initialized"
        );

        Ok(Self {
            renderer,
            head,
            bots: Arc::new(UserAgentClassifier),
            config,
        })
    }

    /// Replace the default crawler classifier.
    pub fn with_bot_classifier(mut self, bots: Arc<dyn BotClassifier>) -> Self {
        self.bots = bots;
        self
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Render `request` into a response.
    ///
    /// `meta` carries the caller's status and headers; document headers are
    /// added to it exactly once, right before the response is returned.
    /// Every error except [`SsrError::Cancelled`] maps to a static page via
    /// [`failure_response`].
    pub async fn assemble(
        &self,
        request: RenderRequest,
        meta: ResponseMeta,
    ) -> Result<Response<DocumentBody>> {
        let mode = self.config.mode;
        if !self.renderer.supports(mode) {
            return Err(SsrError::Unsupported(mode));
        }

        let theme = request.resolve_theme(self.config.default_theme);
        let shell = DocumentShell::new(theme, self.head.collect(&request));

        match mode {
            RenderMode::Streaming => self.assemble_streaming(request, meta, shell).await,
            RenderMode::Buffered => self.assemble_buffered(request, meta, shell).await,
        }
    }

    async fn assemble_streaming(
        &self,
        request: RenderRequest,
        mut meta: ResponseMeta,
        shell: DocumentShell,
    ) -> Result<Response<DocumentBody>> {
        let (sink, events) = RenderSession::channel(self.config.channel_capacity);
        let abort = self.renderer.render_streaming(&request, sink).map_err(|error| {
            tracing::error!(error = %error, url = request.url(), "Renderer failed to start");
            SsrError::Shell(error)
        })?;
        let mut session = RenderSession::new(events, abort);
        let mut cancel = request.cancel_signal().clone();

        if self.bots.is_bot(request.user_agent()) {
            tracing::debug!(
                method = %request.method(),
                url = request.url(),
                "Crawler request, waiting for settlement"
            );

            let settled = self.settle(&mut session, &mut cancel).await?;
            session.complete();
            escalate_status(&mut meta, settled.errors);
            meta.apply_document_headers();

            let mut html = BytesMut::from(shell.prefix().as_bytes());
            for chunk in &settled.chunks {
                html.extend_from_slice(chunk);
            }
            html.extend_from_slice(shell.suffix().as_bytes());

            return Ok(build_response(meta, DocumentBody::Complete(html.freeze())));
        }

        let start = wait_for_shell(&mut session, &mut cancel).await?;
        escalate_status(&mut meta, start.errors);
        meta.apply_document_headers();

        tracing::debug!(
            method = %request.method(),
            url = request.url(),
            status = %meta.status,
            "Shell ready, streaming document"
        );

        let body = document_stream(&shell, start, session, cancel);
        Ok(build_response(meta, DocumentBody::Streaming(body)))
    }

    async fn assemble_buffered(
        &self,
        request: RenderRequest,
        mut meta: ResponseMeta,
        shell: DocumentShell,
    ) -> Result<Response<DocumentBody>> {
        let renderer = Arc::clone(&self.renderer);
        let url = request.url().to_string();

        let markup = tokio::task::spawn_blocking(move || renderer.render_buffered(&request))
            .await
            .map_err(|e| RenderError::new(format!("render task failed: {e}")))
            .and_then(std::convert::identity)
            .map_err(|error| {
                tracing::error!(error = %error, url = %url, "Buffered render failed");
                SsrError::Shell(error)
            })?;

        meta.apply_document_headers();
        Ok(build_response(meta, DocumentBody::from(shell.wrap(&markup))))
    }

    /// Wait until the render has nothing pending, bounded by the crawler timeout.
    async fn settle(
        &self,
        session: &mut RenderSession,
        cancel: &mut CancelSignal,
    ) -> Result<Collected> {
        let timeout = self.config.bot_timeout();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = tokio::time::timeout(timeout, collect_until_settled(session)) => Some(result),
        };

        match outcome {
            None => {
                tracing::debug!("Client cancelled before settlement");
                session.abort();
                Err(SsrError::Cancelled)
            }
            Some(Err(_elapsed)) => {
                tracing::warn!(
                    timeout_ms = self.config.bot_timeout_ms,
                    "Crawler render did not settle in time"
                );
                session.abort();
                Err(SsrError::SettlementTimeout(self.config.bot_timeout_ms))
            }
            Some(Ok(Err(error))) => Err(shell_failed(session, error)),
            Some(Ok(Ok(settled))) => Ok(settled),
        }
    }
}

/// Build the static response for a fatal render outcome.
pub fn failure_response(failure: RenderFailure) -> Response<DocumentBody> {
    let mut response = Response::new(DocumentBody::from(failure.page()));
    *response.status_mut() =
        StatusCode::from_u16(failure.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    response
}

fn build_response(meta: ResponseMeta, body: DocumentBody) -> Response<DocumentBody> {
    let mut response = Response::new(body);
    *response.status_mut() = meta.status;
    *response.headers_mut() = meta.headers;
    response
}

/// Errors before the status is committed turn a successful status into a 500.
fn escalate_status(meta: &mut ResponseMeta, errors: usize) {
    if errors > 0 && !meta.status.is_client_error() && !meta.status.is_server_error() {
        meta.status = StatusCode::INTERNAL_SERVER_ERROR;
    }
}

fn log_render_error(error: &RenderError) {
    tracing::error!(error = %error, "Render error in suspended subtree");
}

fn shell_failed(session: &mut RenderSession, error: RenderError) -> SsrError {
    tracing::error!(error = %error, "Shell render failed");
    session.abort();
    SsrError::Shell(error)
}

fn missing_shell() -> RenderError {
    RenderError::new("renderer finished without producing a shell")
}

async fn wait_for_shell(session: &mut RenderSession, cancel: &mut CancelSignal) -> Result<Collected> {
    let mut start = Collected::default();

    loop {
        let step = tokio::select! {
            biased;
            _ = cancel.cancelled() => Step::Cancelled,
            event = session.next_event() => Step::Event(event),
        };

        match step {
            Step::Cancelled => {
                tracing::debug!("Client cancelled before shell");
                session.abort();
                return Err(SsrError::Cancelled);
            }
            Step::Event(Some(RenderEvent::ShellReady)) => {
                start.shell_ready = true;
                return Ok(start);
            }
            Step::Event(Some(RenderEvent::AllReady)) => {
                start.shell_ready = true;
                start.finished = true;
                return Ok(start);
            }
            Step::Event(Some(RenderEvent::Chunk(chunk))) => start.chunks.push(chunk),
            Step::Event(Some(RenderEvent::Error(error))) => {
                log_render_error(&error);
                start.errors += 1;
            }
            Step::Event(Some(RenderEvent::ShellError(error))) => {
                return Err(shell_failed(session, error));
            }
            Step::Event(None) => return Err(shell_failed(session, missing_shell())),
        }
    }
}

async fn collect_until_settled(
    session: &mut RenderSession,
) -> std::result::Result<Collected, RenderError> {
    let mut settled = Collected::default();

    while let Some(event) = session.next_event().await {
        match event {
            RenderEvent::ShellReady => settled.shell_ready = true,
            RenderEvent::Chunk(chunk) => settled.chunks.push(chunk),
            RenderEvent::Error(error) => {
                log_render_error(&error);
                settled.errors += 1;
            }
            RenderEvent::ShellError(error) if !settled.shell_ready => return Err(error),
            RenderEvent::ShellError(error) => {
                log_render_error(&error);
                settled.errors += 1;
            }
            RenderEvent::AllReady => {
                settled.finished = true;
                return Ok(settled);
            }
        }
    }

    if settled.shell_ready {
        settled.finished = true;
        Ok(settled)
    } else {
        Err(missing_shell())
    }
}

/// Body stream: prefix, chunks held back until the shell, live chunks, suffix.
///
/// Nothing is yielded once cancellation is observed.
fn document_stream(
    shell: &DocumentShell,
    start: Collected,
    mut session: RenderSession,
    mut cancel: CancelSignal,
) -> BoxStream<'static, Bytes> {
    let suffix = Bytes::from_static(shell.suffix().as_bytes());
    let mut queued: VecDeque<Bytes> = VecDeque::with_capacity(start.chunks.len() + 1);
    queued.push_back(Bytes::from(shell.prefix()));
    queued.extend(start.chunks);
    let mut finished = start.finished;

    async_stream::stream! {
        loop {
            if cancel.is_cancelled() {
                tracing::debug!("Client cancelled, stopping document stream");
                session.abort();
                break;
            }

            if let Some(chunk) = queued.pop_front() {
                yield chunk;
                continue;
            }

            if finished {
                session.complete();
                yield suffix.clone();
                break;
            }

            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => Step::Cancelled,
                event = session.next_event() => Step::Event(event),
            };

            match step {
                // Handled at the top of the loop.
                Step::Cancelled => {}
                Step::Event(Some(RenderEvent::Chunk(chunk))) => queued.push_back(chunk),
                Step::Event(Some(RenderEvent::Error(error) | RenderEvent::ShellError(error))) => {
                    log_render_error(&error);
                }
                Step::Event(Some(RenderEvent::ShellReady)) => {}
                Step::Event(Some(RenderEvent::AllReady) | None) => finished = true,
            }
        }
    }
    .boxed()
}

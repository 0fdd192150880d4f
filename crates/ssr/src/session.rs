//! Channel bridge between a renderer and the assembler.
//!
//! The renderer owns a [`RenderSink`] and pushes lifecycle events into it;
//! the assembler consumes them from the matching [`RenderSession`] in the
//! order they were produced.

use std::fmt;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error reported by a renderer. The message is logged, never rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Renderer lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// Enough markup exists to send a paintable document.
    ShellReady,
    /// Next piece of markup, forwarded verbatim.
    Chunk(Bytes),
    /// A suspended subtree failed. The render continues.
    Error(RenderError),
    /// The shell itself failed. Nothing was or will be delivered.
    ShellError(RenderError),
    /// Every chunk has been sent; nothing is pending.
    AllReady,
}

/// The sending half was used after the assembler stopped listening.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("render session closed")]
pub struct SessionClosed;

/// Renderer-side producer of [`RenderEvent`]s.
#[derive(Debug, Clone)]
pub struct RenderSink {
    tx: mpsc::Sender<RenderEvent>,
}

impl RenderSink {
    pub async fn send(&self, event: RenderEvent) -> Result<(), SessionClosed> {
        self.tx.send(event).await.map_err(|_| SessionClosed)
    }

    pub async fn shell_ready(&self) -> Result<(), SessionClosed> {
        self.send(RenderEvent::ShellReady).await
    }

    pub async fn chunk(&self, markup: impl Into<Bytes>) -> Result<(), SessionClosed> {
        self.send(RenderEvent::Chunk(markup.into())).await
    }

    pub async fn error(&self, error: RenderError) -> Result<(), SessionClosed> {
        self.send(RenderEvent::Error(error)).await
    }

    pub async fn shell_error(&self, error: RenderError) -> Result<(), SessionClosed> {
        self.send(RenderEvent::ShellError(error)).await
    }

    pub async fn all_ready(&self) -> Result<(), SessionClosed> {
        self.send(RenderEvent::AllReady).await
    }

    /// True once the assembler has dropped its end.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Stops a running render and releases what it holds.
///
/// Runs at most once.
pub struct RenderAbort {
    abort: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl RenderAbort {
    pub fn new(abort: impl FnOnce() + Send + 'static) -> Self {
        Self {
            abort: Some(Box::new(abort)),
        }
    }

    /// For renderers with nothing to release.
    pub fn noop() -> Self {
        Self { abort: None }
    }

    /// Run the abort if it has not run yet. Returns whether it ran now.
    pub(crate) fn fire(&mut self) -> bool {
        match self.abort.take() {
            Some(abort) => {
                abort();
                true
            }
            None => false,
        }
    }

    pub(crate) fn disarm(&mut self) {
        self.abort = None;
    }
}

impl From<tokio::task::AbortHandle> for RenderAbort {
    fn from(handle: tokio::task::AbortHandle) -> Self {
        Self::new(move || handle.abort())
    }
}

impl fmt::Debug for RenderAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderAbort")
            .field("armed", &self.abort.is_some())
            .finish()
    }
}

/// Assembler-side consumer of a render.
///
/// Dropping an unfinished session aborts the render, so a body stream the
/// host drops on disconnect stops the renderer too.
#[derive(Debug)]
pub(crate) struct RenderSession {
    events: mpsc::Receiver<RenderEvent>,
    abort: RenderAbort,
}

impl RenderSession {
    pub(crate) fn channel(capacity: usize) -> (RenderSink, mpsc::Receiver<RenderEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (RenderSink { tx }, rx)
    }

    pub(crate) fn new(events: mpsc::Receiver<RenderEvent>, abort: RenderAbort) -> Self {
        Self { events, abort }
    }

    pub(crate) async fn next_event(&mut self) -> Option<RenderEvent> {
        self.events.recv().await
    }

    /// Abort the render. No-op after the first call or after completion.
    pub(crate) fn abort(&mut self) {
        self.events.close();
        if self.abort.fire() {
            tracing::debug!("Render aborted");
        }
    }

    /// The render finished on its own; nothing left to abort.
    pub(crate) fn complete(&mut self) {
        self.abort.disarm();
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    fn counting_abort() -> (RenderAbort, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let abort = RenderAbort::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (abort, count)
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (sink, rx) = RenderSession::channel(8);
        let mut session = RenderSession::new(rx, RenderAbort::noop());

        sink.shell_ready().await.unwrap();
        sink.chunk("a").await.unwrap();
        sink.chunk("b").await.unwrap();
        drop(sink);

        assert_eq!(session.next_event().await, Some(RenderEvent::ShellReady));
        assert_eq!(
            session.next_event().await,
            Some(RenderEvent::Chunk(Bytes::from("a")))
        );
        assert_eq!(
            session.next_event().await,
            Some(RenderEvent::Chunk(Bytes::from("b")))
        );
        assert_eq!(session.next_event().await, None);
    }

    #[test]
    fn test_abort_runs_once() {
        let (abort, count) = counting_abort();
        let (_sink, rx) = RenderSession::channel(1);
        let mut session = RenderSession::new(rx, abort);

        session.abort();
        session.abort();
        drop(session);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_aborts_unfinished_session() {
        let (abort, count) = counting_abort();
        let (_sink, rx) = RenderSession::channel(1);
        drop(RenderSession::new(rx, abort));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_completed_session_is_not_aborted() {
        let (abort, count) = counting_abort();
        let (_sink, rx) = RenderSession::channel(1);
        let mut session = RenderSession::new(rx, abort);

        session.complete();
        drop(session);

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sink_reports_closed_session() {
        let (sink, rx) = RenderSession::channel(1);
        drop(RenderSession::new(rx, RenderAbort::noop()));

        assert!(sink.is_closed());
        assert_eq!(sink.chunk("late").await, Err(SessionClosed));
    }
}

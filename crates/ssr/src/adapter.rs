//! Collaborator seams: the component-tree renderer and the head collector.

use hearth_ssr_core::RenderMode;

use crate::{
    request::RenderRequest,
    session::{RenderAbort, RenderError, RenderSink},
};

/// Renders the application's component tree for a request.
///
/// A deployment supports at least one [`RenderMode`]; the assembler checks
/// the configured mode against [`supports`](Self::supports) at startup.
pub trait RendererAdapter: Send + Sync + 'static {
    /// Whether this renderer can serve `mode`.
    fn supports(&self, mode: RenderMode) -> bool;

    /// Start an incremental render that pushes events into `sink`.
    ///
    /// Must return promptly; the actual work runs elsewhere (typically a
    /// spawned task) and stops when the returned abort runs.
    fn render_streaming(
        &self,
        request: &RenderRequest,
        sink: RenderSink,
    ) -> Result<RenderAbort, RenderError> {
        let _ = (request, sink);
        Err(RenderError::new("streaming render not supported"))
    }

    /// Render the whole tree to a string. Called on a blocking thread.
    fn render_buffered(&self, request: &RenderRequest) -> Result<String, RenderError> {
        let _ = request;
        Err(RenderError::new("buffered render not supported"))
    }
}

/// Serializes the `<head>` contributions of the tree for a request.
pub trait HeadCollector: Send + Sync + 'static {
    fn collect(&self, request: &RenderRequest) -> String;
}

impl<F> HeadCollector for F
where
    F: Fn(&RenderRequest) -> String + Send + Sync + 'static,
{
    fn collect(&self, request: &RenderRequest) -> String {
        self(request)
    }
}

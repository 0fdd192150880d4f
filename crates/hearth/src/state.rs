//! Application state.
//!
//! Shared by all request handlers: the assembler built for this deployment,
//! the page catalog and the shutdown signal for in-flight renders.

use std::sync::Arc;

use hearth_ssr::{AssemblerConfig, CancelSignal, Canceller, ResponseAssembler, SsrError};

use crate::pages::{PageCatalog, PageHead, PageRenderer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Response assembler for documents.
    pub assembler: Arc<ResponseAssembler>,
    /// Pages known to the renderer.
    pub pages: Arc<PageCatalog>,
    /// Fired on shutdown so streaming renders stop.
    shutdown: Arc<Canceller>,
}

impl AppState {
    pub fn new(assembler: ResponseAssembler, pages: Arc<PageCatalog>) -> Self {
        let (shutdown, _) = Canceller::new();
        Self {
            assembler: Arc::new(assembler),
            pages,
            shutdown: Arc::new(shutdown),
        }
    }

    /// State rendering the demo page catalog.
    pub fn demo(config: AssemblerConfig) -> Result<Self, SsrError> {
        let pages = Arc::new(PageCatalog::demo());
        let assembler = ResponseAssembler::new(
            config,
            Arc::new(PageRenderer::new(Arc::clone(&pages))),
            Arc::new(PageHead::new(Arc::clone(&pages))),
        )?;
        Ok(Self::new(assembler, pages))
    }

    /// Signal observed by renders started from this state.
    pub fn subscribe_shutdown(&self) -> CancelSignal {
        self.shutdown.signal()
    }

    /// Stop every in-flight render.
    pub fn signal_shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

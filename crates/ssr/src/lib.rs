//! Response assembly - Imperative Shell.
//!
//! This crate orchestrates renders using pure functions from
//! `hearth_ssr_core`. It bridges a renderer's lifecycle events to an HTTP
//! response: streamed for browsers, fully settled for crawlers, or rendered
//! to a string for buffered deployments.
//!
//! # Architecture
//!
//! - **Functional Core** (`hearth_ssr_core`): document shell, config, classification
//! - **Imperative Shell** (this crate): channels, timeouts, cancellation, streaming
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hearth_ssr::{AssemblerConfig, RenderMode, RenderRequest, ResponseAssembler, ResponseMeta};
//!
//! let config = AssemblerConfig::with_defaults(RenderMode::Streaming);
//! let assembler = ResponseAssembler::new(config, Arc::new(MyRenderer), Arc::new(my_head))?;
//!
//! let request = RenderRequest::from_parts(&parts).with_cancel(signal);
//! let response = match assembler.assemble(request, ResponseMeta::default()).await {
//!     Ok(response) => response,
//!     Err(e) => hearth_ssr::failure_response(e.failure().unwrap_or(RenderFailure::Shell)),
//! };
//! ```

mod adapter;
mod assembler;
mod body;
mod error;
mod request;
mod session;

// Re-export core types for convenience
pub use hearth_ssr_core::{
    AssemblerConfig, BotClassifier, Head, RenderFailure, RenderMode, SsrCoreError, Theme,
    UserAgentClassifier, THEME_COOKIE,
};

// Export shell types
pub use adapter::{HeadCollector, RendererAdapter};
pub use assembler::{failure_response, ResponseAssembler};
pub use body::DocumentBody;
pub use error::{Result, SsrError};
pub use request::{CancelSignal, Canceller, RenderRequest, ResponseMeta};
pub use session::{RenderAbort, RenderError, RenderEvent, RenderSink, SessionClosed};

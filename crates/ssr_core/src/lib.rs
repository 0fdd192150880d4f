//! Pure document assembly logic - no I/O, no async, no side effects.
//!
//! This crate provides:
//! - The document shell (prefix/suffix) and static failure pages
//! - Head metadata serialization
//! - Theme resolution and crawler classification
//! - Configuration types with validation
//!
//! # Example
//!
//! ```
//! use hearth_ssr_core::{AssemblerConfig, BotClassifier, DocumentShell, Head, RenderMode, Theme, UserAgentClassifier};
//!
//! let head = Head::new().title("Home").render();
//! let shell = DocumentShell::new(Theme::Dark, head);
//! let html = shell.wrap("<h1>Hello</h1>");
//! assert!(html.contains(r#"data-theme="dark""#));
//!
//! assert!(UserAgentClassifier.is_bot("Googlebot/2.1"));
//!
//! let config = AssemblerConfig::with_defaults(RenderMode::Streaming);
//! assert_eq!(config.bot_timeout_ms, 5_000);
//! ```

mod bot;
mod config;
mod document;
mod error;
mod failure;
mod head;
mod theme;

pub use bot::{BotClassifier, UserAgentClassifier};
pub use config::{AssemblerConfig, RenderMode};
pub use document::{
    DocumentShell, DOCTYPE, DOCUMENT_HEADERS, DOCUMENT_SUFFIX, SERVER_ERROR_PAGE, TIMEOUT_PAGE,
    UNAVAILABLE_PAGE,
};
pub use error::{Result, SsrCoreError, MAX_BOT_TIMEOUT_MS};
pub use failure::RenderFailure;
pub use head::{escape_html, Head};
pub use theme::{Theme, THEME_COOKIE};

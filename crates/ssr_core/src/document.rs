//! Pure document shell generation.
//!
//! A rendered document is always `prefix + markup + suffix`. The prefix is
//! the shell: doctype, root element with the theme attribute, collected head
//! markup and the opening application container.

use crate::theme::Theme;

pub const DOCTYPE: &str = "<!DOCTYPE html>";

/// Closing tags emitted once the application markup is complete.
pub const DOCUMENT_SUFFIX: &str = "</div></body></html>";

/// Static page for renders that failed before the shell was produced.
pub const SERVER_ERROR_PAGE: &str = "<!DOCTYPE html><html><body><h1>Server Error</h1></body></html>";

/// Static page for crawler renders that did not settle in time.
pub const TIMEOUT_PAGE: &str = "<!DOCTYPE html><html><body><h1>Request Timeout</h1></body></html>";

/// Static page for deployments whose renderer cannot serve the configured mode.
pub const UNAVAILABLE_PAGE: &str =
    "<!DOCTYPE html><html><body><h1>Server Rendering Unavailable</h1></body></html>";

/// Headers every document response carries.
///
/// The cross-origin isolation pair is required for `SharedArrayBuffer` in
/// the browser.
pub const DOCUMENT_HEADERS: [(&str, &str); 3] = [
    ("content-type", "text/html"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("cross-origin-opener-policy", "same-origin"),
];

/// Per-request document shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentShell {
    theme: Theme,
    head: String,
}

impl DocumentShell {
    /// Create a shell for the given theme snapshot and serialized head markup.
    pub fn new(theme: Theme, head: impl Into<String>) -> Self {
        Self {
            theme,
            head: head.into(),
        }
    }

    /// Everything that precedes the application markup.
    pub fn prefix(&self) -> String {
        format!(
            r#"{DOCTYPE}<html lang="en" data-theme="{theme}"><head>{head}</head><body><div id="root" class="w-full h-full">"#,
            theme = self.theme,
            head = self.head,
        )
    }

    /// Everything that follows the application markup.
    pub fn suffix(&self) -> &'static str {
        DOCUMENT_SUFFIX
    }

    /// Wrap fully rendered markup into a complete document.
    pub fn wrap(&self, markup: &str) -> String {
        let prefix = self.prefix();
        let mut html = String::with_capacity(prefix.len() + markup.len() + DOCUMENT_SUFFIX.len());
        html.push_str(&prefix);
        html.push_str(markup);
        html.push_str(DOCUMENT_SUFFIX);
        html
    }
}

//! Demo pages served by the binary.
//!
//! Pages are lists of sections. Deferred sections render a fallback in the
//! shell and stream their content once their data "arrives"; in buffered
//! mode they keep the fallback, the same way a string render treats pending
//! boundaries.

use std::{collections::HashMap, sync::Arc, time::Duration};

use hearth_ssr::{
    Head, HeadCollector, RenderAbort, RenderError, RenderMode, RenderRequest, RenderSink,
    RendererAdapter, SessionClosed,
};

/// Client helper that moves streamed content into its placeholder.
const SWAP_SCRIPT: &str = r#"<script>function hearthSwap(i){var t=document.getElementById("hearth-t"+i),d=document.getElementById("hearth-d"+i);if(t&&d){d.replaceWith(t.content.cloneNode(true));t.remove();}}</script>"#;

#[derive(Debug, Clone)]
pub enum Section {
    /// Markup available immediately.
    Static(&'static str),
    /// Markup that resolves after `delay`.
    Deferred {
        fallback: &'static str,
        delay: Duration,
        content: &'static str,
    },
    /// A deferred section whose data never resolves successfully.
    Broken {
        fallback: &'static str,
        delay: Duration,
        reason: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Page {
    pub title: &'static str,
    pub description: &'static str,
    pub sections: Vec<Section>,
}

impl Page {
    fn has_deferred(&self) -> bool {
        self.sections.iter().any(|s| !matches!(s, Section::Static(_)))
    }

    /// Markup available at shell time: static sections plus placeholders.
    fn shell_markup(&self) -> String {
        let mut html = String::new();
        if self.has_deferred() {
            html.push_str(SWAP_SCRIPT);
        }
        for (idx, section) in self.sections.iter().enumerate() {
            match section {
                Section::Static(markup) => html.push_str(markup),
                Section::Deferred { fallback, .. } | Section::Broken { fallback, .. } => {
                    html.push_str(&format!(r#"<div id="hearth-d{idx}">{fallback}</div>"#));
                }
            }
        }
        html
    }

    /// Deferred sections ordered by when they resolve.
    fn pending(&self) -> Vec<(usize, &Section, Duration)> {
        let mut pending: Vec<_> = self
            .sections
            .iter()
            .enumerate()
            .filter_map(|(idx, section)| match section {
                Section::Static(_) => None,
                Section::Deferred { delay, .. } | Section::Broken { delay, .. } => {
                    Some((idx, section, *delay))
                }
            })
            .collect();
        pending.sort_by_key(|(_, _, delay)| *delay);
        pending
    }
}

/// Route table of demo pages.
#[derive(Debug, Clone)]
pub struct PageCatalog {
    pages: HashMap<&'static str, Arc<Page>>,
    not_found: Arc<Page>,
}

impl PageCatalog {
    pub fn demo() -> Self {
        let mut pages = HashMap::new();

        pages.insert(
            "/",
            Arc::new(Page {
                title: "Hearth",
                description: "Server-rendered documents, streamed",
                sections: vec![
                    Section::Static("<header><h1>Hearth</h1><nav><a href=\"/about\">About</a> <a href=\"/dashboard\">Dashboard</a></nav></header>"),
                    Section::Static("<p>The shell you are reading was sent before the rest of the page was ready.</p>"),
                    Section::Deferred {
                        fallback: "<p>Loading recent activity...</p>",
                        delay: Duration::from_millis(150),
                        content: "<section><h2>Recent activity</h2><ul><li>Deployed build 42</li><li>Rotated keys</li></ul></section>",
                    },
                ],
            }),
        );

        pages.insert(
            "/about",
            Arc::new(Page {
                title: "About - Hearth",
                description: "What this server does",
                sections: vec![Section::Static(
                    "<h1>About</h1><p>Crawlers receive fully settled documents. Browsers receive the shell first.</p>",
                )],
            }),
        );

        pages.insert(
            "/dashboard",
            Arc::new(Page {
                title: "Dashboard - Hearth",
                description: "Several independent widgets",
                sections: vec![
                    Section::Static("<h1>Dashboard</h1>"),
                    Section::Deferred {
                        fallback: "<p>Loading usage...</p>",
                        delay: Duration::from_millis(100),
                        content: "<section><h2>Usage</h2><p>1,204 requests today</p></section>",
                    },
                    Section::Broken {
                        fallback: "<p>Loading billing...</p>",
                        delay: Duration::from_millis(150),
                        reason: "billing service unavailable",
                    },
                    Section::Deferred {
                        fallback: "<p>Loading alerts...</p>",
                        delay: Duration::from_millis(250),
                        content: "<section><h2>Alerts</h2><p>No open alerts</p></section>",
                    },
                ],
            }),
        );

        let not_found = Arc::new(Page {
            title: "Not Found - Hearth",
            description: "Page not found",
            sections: vec![Section::Static(
                "<h1>Not found</h1><p><a href=\"/\">Back home</a></p>",
            )],
        });

        Self { pages, not_found }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    /// The page for `path`, or the not-found page.
    pub fn resolve(&self, path: &str) -> Arc<Page> {
        self.pages
            .get(path)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.not_found))
    }
}

/// Renders catalog pages in either mode.
pub struct PageRenderer {
    catalog: Arc<PageCatalog>,
}

impl PageRenderer {
    pub fn new(catalog: Arc<PageCatalog>) -> Self {
        Self { catalog }
    }
}

impl RendererAdapter for PageRenderer {
    fn supports(&self, _mode: RenderMode) -> bool {
        true
    }

    fn render_streaming(
        &self,
        request: &RenderRequest,
        sink: RenderSink,
    ) -> Result<RenderAbort, RenderError> {
        let page = self.catalog.resolve(request.uri().path());
        let url = request.url().to_string();

        let task = tokio::spawn(async move {
            if let Err(SessionClosed) = stream_page(&page, &sink).await {
                tracing::debug!(url = %url, "Render session closed before page finished");
            }
        });

        Ok(RenderAbort::from(task.abort_handle()))
    }

    fn render_buffered(&self, request: &RenderRequest) -> Result<String, RenderError> {
        Ok(self.catalog.resolve(request.uri().path()).shell_markup())
    }
}

async fn stream_page(page: &Page, sink: &RenderSink) -> Result<(), SessionClosed> {
    sink.shell_ready().await?;
    sink.chunk(page.shell_markup()).await?;

    let mut elapsed = Duration::ZERO;
    for (idx, section, delay) in page.pending() {
        tokio::time::sleep(delay.saturating_sub(elapsed)).await;
        elapsed = delay;

        match section {
            Section::Deferred { content, .. } => {
                sink.chunk(format!(
                    r#"<template id="hearth-t{idx}">{content}</template><script>hearthSwap({idx})</script>"#
                ))
                .await?;
            }
            Section::Broken { reason, .. } => {
                sink.error(RenderError::new(format!("section {idx}: {reason}")))
                    .await?;
            }
            Section::Static(_) => {}
        }
    }

    sink.all_ready().await
}

/// Head metadata for catalog pages.
pub struct PageHead {
    catalog: Arc<PageCatalog>,
}

impl PageHead {
    pub fn new(catalog: Arc<PageCatalog>) -> Self {
        Self { catalog }
    }
}

impl HeadCollector for PageHead {
    fn collect(&self, request: &RenderRequest) -> String {
        let page = self.catalog.resolve(request.uri().path());
        Head::new()
            .title(page.title)
            .meta("viewport", "width=device-width, initial-scale=1")
            .meta("description", page.description)
            .render()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, Method, Uri};

    use super::*;

    fn request(path: &'static str) -> RenderRequest {
        RenderRequest::new(Method::GET, Uri::from_static(path), HeaderMap::new())
    }

    #[test]
    fn test_unknown_path_resolves_not_found_page() {
        let catalog = PageCatalog::demo();
        assert!(!catalog.contains("/nope"));
        assert_eq!(catalog.resolve("/nope").title, "Not Found - Hearth");
    }

    #[test]
    fn test_shell_markup_has_placeholders() {
        let page = PageCatalog::demo().resolve("/dashboard");
        let html = page.shell_markup();

        assert!(html.starts_with(SWAP_SCRIPT));
        assert!(html.contains(r#"<div id="hearth-d1"><p>Loading usage...</p></div>"#));
        assert!(html.contains(r#"<div id="hearth-d3"><p>Loading alerts...</p></div>"#));
        assert!(!html.contains("No open alerts"));
    }

    #[test]
    fn test_static_page_has_no_swap_script() {
        let page = PageCatalog::demo().resolve("/about");
        assert!(!page.shell_markup().contains("hearthSwap"));
    }

    #[test]
    fn test_pending_sorted_by_delay() {
        let page = PageCatalog::demo().resolve("/dashboard");
        let order: Vec<usize> = page.pending().into_iter().map(|(idx, _, _)| idx).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_buffered_render_keeps_fallbacks() {
        let renderer = PageRenderer::new(Arc::new(PageCatalog::demo()));
        let html = renderer.render_buffered(&request("/")).unwrap();

        assert!(html.contains("Loading recent activity..."));
        assert!(!html.contains("Deployed build 42"));
    }

    #[test]
    fn test_head_collects_page_metadata() {
        let head = PageHead::new(Arc::new(PageCatalog::demo()));
        let html = head.collect(&request("/about"));

        assert!(html.contains("<title>About - Hearth</title>"));
        assert!(html.contains(r#"<meta name="description" content="What this server does">"#));
    }
}

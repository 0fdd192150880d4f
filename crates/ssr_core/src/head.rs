//! Head metadata builder.
//!
//! Head collectors use this to serialize the `<head>` contributions of a page.
//! All attribute and text values are escaped.

/// Head elements contributed by a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Head {
    title: Option<String>,
    meta: Vec<(String, String)>,
    links: Vec<(String, String)>,
}

impl Head {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a `<meta name=.. content=..>` tag.
    pub fn meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta.push((name.into(), content.into()));
        self
    }

    /// Add a `<link rel=.. href=..>` tag.
    pub fn link(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.links.push((rel.into(), href.into()));
        self
    }

    /// Add a stylesheet link.
    pub fn stylesheet(self, href: impl Into<String>) -> Self {
        self.link("stylesheet", href)
    }

    /// Serialize to head markup. Always starts with the charset declaration.
    pub fn render(&self) -> String {
        let mut html = String::from(r#"<meta charset="utf-8">"#);

        if let Some(title) = &self.title {
            html.push_str("<title>");
            html.push_str(&escape_html(title));
            html.push_str("</title>");
        }

        for (name, content) in &self.meta {
            html.push_str(&format!(
                r#"<meta name="{}" content="{}">"#,
                escape_html(name),
                escape_html(content)
            ));
        }

        for (rel, href) in &self.links {
            html.push_str(&format!(
                r#"<link rel="{}" href="{}">"#,
                escape_html(rel),
                escape_html(href)
            ));
        }

        html
    }
}

/// Escape text for use in HTML text nodes and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

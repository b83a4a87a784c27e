use crate::rendering::markdown::render_markdown;
use crate::rendering::sanitize::sanitize_html;

/// How a fetched document body must be turned into HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Markdown,
    Html,
}

impl SourceFormat {
    /// `"markdown"` selects Markdown; every other tag means pre-rendered HTML.
    pub fn from_doc_type(doc_type: &str) -> Self {
        if doc_type == crate::models::blog::MARKDOWN_DOC_TYPE {
            SourceFormat::Markdown
        } else {
            SourceFormat::Html
        }
    }
}

/// Convert a raw document body into sanitized HTML.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn render_document(format: SourceFormat, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let unsafe_html = match format {
        SourceFormat::Markdown => render_markdown(&text),
        SourceFormat::Html => text.into_owned(),
    };
    sanitize_html(&unsafe_html)
}

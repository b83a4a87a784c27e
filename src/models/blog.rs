use serde::{Deserialize, Serialize};

/// Document type tag selecting Markdown conversion.
pub const MARKDOWN_DOC_TYPE: &str = "markdown";

/// Blog metadata as served by the backend API.
///
/// Every field is defaulted so partial payloads still decode; only
/// malformed JSON is an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogMetadata {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub description_link: String,
    pub author: String,
    pub formatted_date: String,
    /// URL of the pre-rendered HTML document.
    pub html: String,
    /// URL of the Markdown document.
    pub markdown: String,
    pub doc_type: String,
    pub thumbnail: String,
    pub is_technical: bool,
    pub is_public: bool,
    pub is_deleted: bool,
    /// `true` when the entry is a thread made of `sub_blogs`.
    pub is_series: bool,
    pub sub_blogs: Vec<SubDocument>,
}

/// One part of a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubDocument {
    pub title: String,
    pub description: String,
    pub formatted_date: String,
    pub html: String,
    pub markdown: String,
    pub doc_type: String,
}

impl BlogMetadata {
    pub fn is_markdown(&self) -> bool {
        self.doc_type == MARKDOWN_DOC_TYPE
    }
}

impl SubDocument {
    pub fn is_markdown(&self) -> bool {
        self.doc_type == MARKDOWN_DOC_TYPE
    }

    /// Location of the document body, picked by the type tag.
    pub fn source_url(&self) -> &str {
        if self.is_markdown() {
            &self.markdown
        } else {
            &self.html
        }
    }
}

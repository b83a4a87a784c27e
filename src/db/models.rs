use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A portfolio project stored in the `projects` collection.
///
/// All fields default so that projected reads (which omit fields) still
/// deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub id_str: String,
    pub title: String,
    pub description: String,
    pub description_link: String,
    /// URL of the pre-rendered HTML document.
    pub html: String,
    /// URL of the Markdown document.
    pub markdown: String,
    /// Numeric document type code.
    pub doc_type: i32,
    pub thumbnail: String,
    pub link: String,
    /// Creation time, Unix seconds.
    pub created_at: i64,
    pub is_major: bool,
    pub is_public: bool,
    pub is_deleted: bool,
}

/// Fields a client may set when creating or updating a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub description_link: String,
    pub html: String,
    pub markdown: String,
    pub doc_type: i32,
    pub thumbnail: String,
    pub link: String,
    pub is_major: bool,
    pub is_public: bool,
}

impl ProjectInput {
    /// Build a fresh record, stamping `created_at` and assigning an id.
    pub fn into_project(self, created_at: i64) -> Project {
        let id = ObjectId::new();
        Project {
            id: Some(id),
            id_str: id.to_hex(),
            title: self.title,
            description: self.description,
            description_link: self.description_link,
            html: self.html,
            markdown: self.markdown,
            doc_type: self.doc_type,
            thumbnail: self.thumbnail,
            link: self.link,
            created_at,
            is_major: self.is_major,
            is_public: self.is_public,
            is_deleted: false,
        }
    }
}

/// Partial update: only the fields present in the request are `$set`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_major: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// An administrator allowed into the private API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// Google account id (`id` field of the userinfo response).
    #[serde(rename = "googleid")]
    pub google_id: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Admin {
    pub fn new(email: impl Into<String>, google_id: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: None,
            email: email.into(),
            google_id: google_id.into(),
            created_at,
        }
    }
}

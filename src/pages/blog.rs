use axum::extract::{Path, State};
use axum::response::Html;
use serde::Serialize;

use crate::app::AppState;
use crate::error::AppError;
use crate::fetch::client::fetch_both;
use crate::models::blog::BlogMetadata;
use crate::pages::errors::PageError;
use crate::rendering::document::{render_document, SourceFormat};
use crate::rendering::templates::EACH_DOC;

pub const BLOG_NOT_FOUND: &str = "Blog Not Found";

/// Decode blog metadata from the API response body.
pub fn decode_blog(body: &[u8]) -> Result<BlogMetadata, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::Decode(format!("blog metadata: {e}")))
}

#[derive(Serialize)]
struct DocView<'a> {
    data: &'a BlogMetadata,
    html: String,
    project: bool,
}

/// `GET /blog/{id}`: one blog entry with its rendered document.
///
/// Metadata and document body are fetched concurrently; if either fails
/// the page is a 404.
pub async fn each_blog_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let templates = &state.templates;

    let (metadata, document) = fetch_both(
        state.fetcher.clone(),
        state.blog_api.blog(&id),
        state.blog_api.blog_document(&id),
        state.settings.fetch_timeout(),
    )
    .await
    .map_err(|e| PageError::not_found(templates, BLOG_NOT_FOUND, &e))?;

    let metadata = metadata.map_err(|e| PageError::not_found(templates, BLOG_NOT_FOUND, &e))?;
    let document = document.map_err(|e| PageError::not_found(templates, BLOG_NOT_FOUND, &e))?;

    let data = decode_blog(&metadata).map_err(|e| PageError::internal(templates, &e))?;

    let html = render_document(SourceFormat::from_doc_type(&data.doc_type), &document);

    let page = templates
        .render(
            EACH_DOC,
            &DocView {
                data: &data,
                html,
                project: false,
            },
        )
        .map_err(|e| PageError::template(templates, e))?;

    Ok(Html(page))
}

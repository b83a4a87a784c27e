use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::AppError;
use crate::models::blog::{BlogMetadata, SubDocument};
use crate::pages::blog::{decode_blog, BLOG_NOT_FOUND};
use crate::pages::errors::PageError;
use crate::rendering::document::{render_document, SourceFormat};
use crate::rendering::templates::EACH_THREAD;

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub index: Option<String>,
}

/// Parse the zero-based `index` query value.
///
/// Missing, non-numeric and negative values are all rejected.
pub fn parse_index(raw: Option<&str>) -> Result<usize, AppError> {
    raw.unwrap_or_default()
        .parse::<i64>()
        .ok()
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| AppError::BadRequest("Invalid Index".into()))
}

/// Characters escaped in a path segment (WHATWG path set plus `/` and `%`).
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Link to one part of a thread.
pub fn thread_url(id: &str, index: usize) -> String {
    let id = utf8_percent_encode(id, PATH_SEGMENT);
    format!("/thread/{id}?index={index}")
}

/// Previous and next links around `index`; empty at either boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadLinks {
    pub prev: String,
    pub next: String,
}

pub fn thread_links(id: &str, index: usize, len: usize) -> ThreadLinks {
    let prev = if index == 0 {
        String::new()
    } else {
        thread_url(id, index - 1)
    };
    let next = if index + 1 < len {
        thread_url(id, index + 1)
    } else {
        String::new()
    };
    ThreadLinks { prev, next }
}

/// What a thread request resolves to once the metadata is known.
#[derive(Debug, PartialEq, Eq)]
pub enum ThreadTarget {
    /// Render the sub-document at this index.
    Part(usize),
    /// The index is past the end; start over at 0.
    RestartAtZero,
}

/// Check the thread invariants and resolve `index` against them.
pub fn resolve_part(data: &BlogMetadata, index: usize) -> Result<ThreadTarget, AppError> {
    if !data.is_series {
        return Err(AppError::BadRequest("Not A Thread".into()));
    }
    if data.sub_blogs.is_empty() {
        return Err(AppError::BadRequest("Empty Thread".into()));
    }
    if index >= data.sub_blogs.len() {
        return Ok(ThreadTarget::RestartAtZero);
    }
    Ok(ThreadTarget::Part(index))
}

#[derive(Serialize)]
struct ThreadView<'a> {
    data: &'a BlogMetadata,
    sub_blog: &'a SubDocument,
    index: usize,
    prev_sub_url: String,
    next_sub_url: String,
    html: String,
    project: bool,
}

/// `GET /thread/{id}?index=N`: one part of a multi-part blog.
///
/// Fetches are sequential: the document location is only known once the
/// thread metadata has been read.
pub async fn each_thread_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ThreadQuery>,
) -> Result<Response, PageError> {
    let templates = &state.templates;

    let index = parse_index(query.index.as_deref())
        .map_err(|e| PageError::bad_request(templates, &bad_request_message(e)))?;

    let metadata = state
        .fetcher
        .fetch_sync(&state.blog_api.blog(&id))
        .await
        .map_err(|e| PageError::not_found(templates, BLOG_NOT_FOUND, &e))?;

    let data = decode_blog(&metadata).map_err(|e| PageError::internal(templates, &e))?;

    let index = match resolve_part(&data, index)
        .map_err(|e| PageError::bad_request(templates, &bad_request_message(e)))?
    {
        ThreadTarget::Part(index) => index,
        // Redirect::to is a 303 See Other
        ThreadTarget::RestartAtZero => return Ok(Redirect::to(&thread_url(&id, 0)).into_response()),
    };

    let sub_blog = &data.sub_blogs[index];
    let document = state
        .fetcher
        .fetch_sync(sub_blog.source_url())
        .await
        .map_err(|e| PageError::not_found(templates, "Document Not Found", &e))?;

    let html = render_document(SourceFormat::from_doc_type(&sub_blog.doc_type), &document);
    let links = thread_links(&data.id, index, data.sub_blogs.len());

    let page = templates
        .render(
            EACH_THREAD,
            &ThreadView {
                data: &data,
                sub_blog,
                index,
                prev_sub_url: links.prev,
                next_sub_url: links.next,
                html,
                project: false,
            },
        )
        .map_err(|e| PageError::template(templates, e))?;

    Ok(Html(page).into_response())
}

fn bad_request_message(err: AppError) -> String {
    match err {
        AppError::BadRequest(msg) => msg,
        other => other.to_string(),
    }
}

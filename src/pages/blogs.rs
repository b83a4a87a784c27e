use axum::extract::{Query, State};
use axum::response::Html;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::app::AppState;
use crate::error::AppError;
use crate::fetch::client::fetch_async;
use crate::models::blog::BlogMetadata;
use crate::pages::errors::PageError;
use crate::rendering::templates::BLOGS;

/// Cookie remembering the "technical only" filter.
pub const TECH_COOKIE: &str = "tech";

/// `Max-Age` of the `tech` cookie. Shorter than its one-month `Expires`;
/// browsers honour `Max-Age`, so the preference lasts a day.
pub const TECH_COOKIE_MAX_AGE: Duration = Duration::seconds(86400);

#[derive(Debug, Deserialize)]
pub struct BlogsQuery {
    pub tech: Option<String>,
}

/// Resolve the "technical only" preference.
///
/// An explicit `tech` query value wins and yields a cookie to store; any
/// value other than `"true"`/`"false"` means not technical and stores
/// nothing. Without the parameter the existing cookie decides.
pub fn tech_preference(query: Option<&str>, cookie: Option<&str>) -> (bool, Option<Cookie<'static>>) {
    match query {
        Some("true") => (true, Some(tech_cookie("true"))),
        Some("false") => (false, Some(tech_cookie("false"))),
        Some(_) => (false, None),
        None => (cookie == Some("true"), None),
    }
}

fn tech_cookie(value: &'static str) -> Cookie<'static> {
    Cookie::build((TECH_COOKIE, value))
        .path("/")
        .expires(OffsetDateTime::now_utc() + Duration::days(30))
        .max_age(TECH_COOKIE_MAX_AGE)
        .build()
}

/// Decode the blog list; a JSON `null` is an empty list.
pub fn decode_blog_list(body: &[u8]) -> Result<Vec<BlogMetadata>, AppError> {
    serde_json::from_slice::<Option<Vec<BlogMetadata>>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::Decode(format!("blog list: {e}")))
}

#[derive(Serialize)]
struct BlogsView {
    tech: bool,
    data: Vec<BlogMetadata>,
}

/// `GET /blogs[?tech=true|false]`: the blog list.
pub async fn blogs_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<BlogsQuery>,
) -> Result<(CookieJar, Html<String>), PageError> {
    let templates = &state.templates;

    let (tech, cookie) = tech_preference(
        query.tech.as_deref(),
        jar.get(TECH_COOKIE).map(|c| c.value()),
    );

    let body = fetch_async(state.fetcher.clone(), state.blog_api.all_blogs(tech))
        .wait()
        .await
        .map_err(|e| PageError::internal(templates, &e))?;

    let data = decode_blog_list(&body).map_err(|e| PageError::internal(templates, &e))?;

    let page = templates
        .render(BLOGS, &BlogsView { tech, data })
        .map_err(|e| PageError::template(templates, e))?;

    let jar = match cookie {
        Some(cookie) => jar.add(cookie),
        None => jar,
    };

    Ok((jar, Html(page)))
}

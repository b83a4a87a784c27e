use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{delete, get, post, put};
use axum::Router;
use axum_extra::extract::cookie::Key;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::{self, IdentityProvider};
use crate::config::Settings;
use crate::db::admin_repository::AdminRepository;
use crate::db::repository::ProjectRepository;
use crate::fetch::client::Fetcher;
use crate::fetch::endpoints::BlogApi;
use crate::pages;
use crate::rendering::templates::Templates;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn Fetcher>,
    pub blog_api: BlogApi,
    pub templates: Arc<Templates>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub admin_repo: Arc<dyn AdminRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub settings: Arc<Settings>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Build the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/blogs", get(pages::blogs::blogs_handler))
        .route("/blog/{id}", get(pages::blog::each_blog_handler))
        .route("/thread/{id}", get(pages::thread::each_thread_handler))
        // OAuth
        .route("/auth/google", get(auth::handlers::login_handler))
        .route("/auth/google/callback", get(auth::handlers::callback_handler))
        .route("/auth/me", get(auth::handlers::me_handler))
        .route("/auth/logout", post(auth::handlers::logout_handler))
        // Project API
        .route(
            "/api/public/project/all",
            get(api::projects::list_public_handler),
        )
        .route(
            "/api/public/project/{id}",
            get(api::projects::get_public_handler),
        )
        .route(
            "/api/private/project/all",
            get(api::projects::list_all_handler),
        )
        .route("/api/private/project", post(api::projects::create_handler))
        .route(
            "/api/private/project/{id}",
            put(api::projects::update_handler).delete(api::projects::delete_handler),
        )
        .route(
            "/api/private/project/{id}/permanent",
            delete(api::projects::delete_permanent_handler),
        )
        .route("/healthz", get(|| async { "ok" }))
        // Static assets
        .fallback_service(ServeDir::new(&state.settings.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

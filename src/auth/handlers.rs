use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::PrivateCookieJar;
use openidconnect::CsrfToken;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::middleware::{
    authorize_admin, session_cookie, RequireAdmin, OAUTH_STATE_COOKIE, SESSION_COOKIE,
};
use crate::auth::models::AdminSession;
use crate::auth::IdentityProvider;
use crate::config::Settings;
use crate::db::admin_repository::AdminRepository;
use crate::db::models::Admin;
use crate::error::AppError;

/// Query string the provider appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Core login completion, separated from the HTTP layer for testability.
///
/// Exchanges the code, fetches the profile, checks the allow-list and
/// returns the admin record, creating it on first login.
pub async fn complete_login(
    identity: &dyn IdentityProvider,
    admins: &dyn AdminRepository,
    settings: &Settings,
    code: &str,
) -> Result<AdminSession, AppError> {
    let access_token = identity.exchange_code(code).await?;
    let info = identity.user_info(&access_token).await?;

    authorize_admin(settings, &info)?;

    if let Some(admin) = admins.get(&info.email, &info.id).await? {
        return Ok(AdminSession::from(&admin));
    }

    let admin = Admin {
        id: Some(mongodb::bson::oid::ObjectId::new()),
        ..Admin::new(info.email, info.id, chrono::Utc::now().timestamp())
    };
    admins.create(admin.clone()).await?;
    Ok(AdminSession::from(&admin))
}

/// `GET /auth/google`: start the authorization-code flow.
///
/// A fresh random state is stored in an encrypted, short-lived cookie and
/// sent to the provider; the callback must echo it back.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let csrf = CsrfToken::new_random();
    let url = state.identity.authorize_url(&csrf);

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, csrf.secret().to_string()))
        .path("/auth")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(10))
        .build();

    (jar.add(cookie), Redirect::temporary(&url))
}

/// `GET /auth/google/callback`: validate state, finish the login.
///
/// Any failure is logged and the browser is sent back to `/`.
pub async fn callback_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(query): Query<AuthCallbackQuery>,
) -> Response {
    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/auth"));

    let result = match (&query.error, &query.code, &query.state, &expected) {
        (Some(error), ..) => Err(AppError::Auth(format!("Provider returned error: {error}"))),
        (None, Some(code), Some(returned), Some(expected)) if returned == expected => {
            complete_login(
                state.identity.as_ref(),
                state.admin_repo.as_ref(),
                &state.settings,
                code,
            )
            .await
        }
        (None, None, ..) => Err(AppError::Auth("Missing authorization code".into())),
        _ => Err(AppError::Auth("Invalid oauth state".into())),
    };

    match result.and_then(|session| {
        let cookie = session_cookie(&session)?;
        Ok((session, cookie))
    }) {
        Ok((session, cookie)) => {
            tracing::info!("Admin {} signed in", session.email);
            (jar.add(cookie), Redirect::temporary("/")).into_response()
        }
        Err(e) => {
            tracing::warn!("OAuth callback failed: {e}");
            (jar, Redirect::temporary("/")).into_response()
        }
    }
}

/// `GET /auth/me`: the current admin session.
pub async fn me_handler(RequireAdmin(session): RequireAdmin) -> Json<AdminSession> {
    Json(session)
}

/// `POST /auth/logout`: clear the admin session cookie.
pub async fn logout_handler(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

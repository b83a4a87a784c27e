use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use axum_extra::extract::PrivateCookieJar;
use sha2::{Digest, Sha512};

use crate::app::AppState;
use crate::auth::models::{AdminSession, GoogleUserInfo};
use crate::config::Settings;
use crate::error::AppError;

/// Encrypted cookie holding the signed-in admin.
pub const SESSION_COOKIE: &str = "folio_session";
/// Encrypted cookie holding the anti-forgery state of an in-flight login.
pub const OAUTH_STATE_COOKIE: &str = "folio_oauth_state";

/// Derive the cookie encryption key from the configured session secret.
///
/// SHA-512 yields exactly the 64 bytes `Key::from` requires, whatever the
/// length of the secret.
pub fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Build the session cookie for `session`.
pub fn session_cookie(session: &AdminSession) -> Result<Cookie<'static>, AppError> {
    let value = serde_json::to_string(session)
        .map_err(|e| AppError::Internal(format!("Failed to serialize session: {e}")))?;
    Ok(Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build())
}

/// Read the admin session out of the jar, if any.
pub fn read_session(jar: &PrivateCookieJar) -> Option<AdminSession> {
    let cookie = jar.get(SESSION_COOKIE)?;
    match serde_json::from_str(cookie.value()) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Discarding unreadable session cookie: {e}");
            None
        }
    }
}

/// Only verified emails on the allow-list may become admins.
pub fn authorize_admin(settings: &Settings, info: &GoogleUserInfo) -> Result<(), AppError> {
    if !info.verified_email {
        return Err(AppError::Forbidden(format!(
            "Email {} is not verified",
            info.email
        )));
    }
    if !settings.is_admin_email(&info.email) {
        return Err(AppError::Forbidden(format!(
            "{} is not an administrator",
            info.email
        )));
    }
    Ok(())
}

/// Extractor for routes only administrators may call.
///
/// Rejects with 401 when there is no session and 403 when the session's
/// email has since been removed from the allow-list.
pub struct RequireAdmin(pub AdminSession);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar: PrivateCookieJar = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        let session =
            read_session(&jar).ok_or_else(|| AppError::Auth("Not logged in".into()))?;

        if !state.settings.is_admin_email(&session.email) {
            return Err(AppError::Forbidden(format!(
                "{} is not an administrator",
                session.email
            )));
        }

        Ok(RequireAdmin(session))
    }
}

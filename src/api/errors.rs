use crate::error::AppError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

impl AppError {
    /// Status code used by both the JSON API and the HTML pages.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::Fetch(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_)
            | AppError::Decode(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API-specific error wrapper that converts AppError into HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::Auth(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Database(msg) => {
                tracing::error!("database error: {msg}");
                format!("Database error: {}", msg)
            }
            AppError::Fetch(msg) => {
                tracing::warn!("upstream fetch failed: {msg}");
                "Not Found".to_string()
            }
            AppError::Decode(msg) => {
                tracing::error!("decode failed: {msg}");
                "Internal Server Error".to_string()
            }
            AppError::Template(msg) => msg.clone(),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

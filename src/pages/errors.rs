use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;
use crate::rendering::templates::{Templates, ERROR};

/// Fixed message for upstream decode failures.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// An error rendered as an HTML page.
///
/// The message is shown to the reader as-is; callers log the underlying
/// cause before building one.
pub struct PageError {
    status: StatusCode,
    message: String,
    templates: Arc<Templates>,
}

#[derive(Serialize)]
struct ErrorView<'a> {
    status: u16,
    message: &'a str,
}

impl PageError {
    pub fn new(templates: &Arc<Templates>, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            templates: templates.clone(),
        }
    }

    /// 400 with a specific validation message.
    pub fn bad_request(templates: &Arc<Templates>, message: &str) -> Self {
        Self::new(templates, StatusCode::BAD_REQUEST, message)
    }

    /// 404 with a fixed message; the cause is only logged.
    pub fn not_found(templates: &Arc<Templates>, message: &str, cause: &AppError) -> Self {
        tracing::warn!("{message}: {cause}");
        Self::new(templates, StatusCode::NOT_FOUND, message)
    }

    /// 500 with the fixed message; the cause is only logged.
    pub fn internal(templates: &Arc<Templates>, cause: &AppError) -> Self {
        tracing::error!("{INTERNAL_SERVER_ERROR}: {cause}");
        Self::new(templates, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
    }

    /// 500 carrying the template engine's own error text.
    pub fn template(templates: &Arc<Templates>, cause: AppError) -> Self {
        tracing::error!("Template rendering failed: {cause}");
        Self::new(templates, StatusCode::INTERNAL_SERVER_ERROR, cause.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let view = ErrorView {
            status: self.status.as_u16(),
            message: &self.message,
        };
        match self.templates.render(ERROR, &view) {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Error page failed to render: {e}");
                (self.status, self.message).into_response()
            }
        }
    }
}

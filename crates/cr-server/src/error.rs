//! Error-to-HTTP response conversion.
//!
//! Only errors that abort a request before extraction (bad key, invalid body)
//! take this path; extraction failures are reported in the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: cr_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: cr_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }
}

impl From<cr_core::Error> for AppError {
    fn from(e: cr_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            cr_core::Error::Forbidden(_) => "forbidden",
            cr_core::Error::Validation(_) => "validation_error",
            cr_core::Error::AccessDenied(_) => "access_denied",
            cr_core::Error::Extraction(_) => "extraction_error",
            cr_core::Error::CredentialPersist { .. } => "credential_error",
            cr_core::Error::Io { .. } => "io_error",
            cr_core::Error::Tool { .. } => "tool_error",
            cr_core::Error::Internal(_) => "internal_error",
        };

        // Forbidden keeps the bare message callers already match on.
        let message = match &self.inner {
            cr_core::Error::Forbidden(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = json!({
            "error": message,
            "code": code,
            "request_id": self.request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}

//! API-key authentication middleware.
//!
//! Callers present the shared secret in `x-api-key`. A missing or wrong key
//! is rejected with 403 before the body is read. With no key configured every
//! request is rejected.

use axum::extract::State;
use axum::http::{HeaderName, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// Header carrying the shared secret.
pub static X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Message returned for a rejected key.
pub const INVALID_API_KEY: &str = "Invalid API Key";

/// Whether `presented` matches the configured key.
pub fn validate_api_key(configured: Option<&str>, presented: Option<&str>) -> bool {
    match (configured, presented) {
        (Some(expected), Some(given)) if !expected.is_empty() => {
            constant_time_eq(expected.as_bytes(), given.as_bytes())
        }
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Authentication middleware. Applied to the extraction routes only.
pub async fn auth_middleware(
    State(ctx): State<AppContext>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let presented = request
        .headers()
        .get(&X_API_KEY)
        .and_then(|v| v.to_str().ok());

    if validate_api_key(ctx.config.auth.api_key.as_deref(), presented) {
        return Ok(next.run(request).await);
    }

    if ctx.config.auth.api_key.is_none() {
        tracing::error!("Rejecting request: no API key configured");
    } else {
        tracing::warn!("Rejecting request with invalid API key");
    }

    let mut err = AppError::new(cr_core::Error::Forbidden(INVALID_API_KEY.into()));
    if let Some(id) = request.extensions().get::<RequestId>() {
        err = err.with_request_id(id.0.clone());
    }
    Err(err.into_response())
}

/// Generate a random API key.
pub fn generate_api_key() -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

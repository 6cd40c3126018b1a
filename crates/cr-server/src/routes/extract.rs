//! `POST /api/extract`: resolve a share link to a direct media URL.

use axum::extract::{Extension, State};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cr_core::{Error, ExtractionRequest, ResolvedVideo};
use cr_extract::normalize;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// Response header reporting whether the result came from the cache.
pub static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Message for extractor "not found / access denied" outcomes.
pub const ACCESS_DENIED_MESSAGE: &str = "Video not found or access denied (DownloadError).";

/// Body returned by the extraction endpoint.
///
/// Both shapes are sent with status 200; `success` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Success(SuccessBody),
    Failure(FailureBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody {
    pub success: bool,
    pub title: String,
    pub video_url: String,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub uploader: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
}

impl ApiResponse {
    pub fn success(video: ResolvedVideo) -> Self {
        Self::Success(SuccessBody {
            success: true,
            title: video.title,
            video_url: video.video_url,
            thumbnail: video.thumbnail,
            duration: video.duration,
            uploader: video.uploader,
        })
    }

    /// Failure body for an error where [`Error::is_extraction_failure`] holds.
    pub fn failure(err: &Error) -> Self {
        let error = match err {
            Error::AccessDenied(_) => ACCESS_DENIED_MESSAGE.to_string(),
            Error::Extraction(_) => err.to_string(),
            other => format!("Extraction failed: {other}"),
        };
        Self::Failure(FailureBody {
            success: false,
            error,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Resolve a request, bypassing HTTP. Shared with the CLI `extract` command.
///
/// Returns the body and whether it came from the cache. Extraction-path
/// failures become a failure body; anything else is returned as an error.
pub async fn resolve(
    ctx: &AppContext,
    request: ExtractionRequest,
) -> cr_core::Result<(ApiResponse, bool)> {
    let key = normalize(&request.url);

    if let Some(video) = ctx.cache.get(&key) {
        tracing::info!("Cache hit for {key}");
        return Ok((ApiResponse::success(video), true));
    }

    match ctx.gateway.resolve(&request).await {
        Ok(video) => {
            tracing::info!("Resolved {key}");
            ctx.cache.insert(key, video.clone());
            Ok((ApiResponse::success(video), false))
        }
        Err(e) if e.is_extraction_failure() => Ok((ApiResponse::failure(&e), false)),
        Err(e) => Err(e),
    }
}

pub async fn extract(
    State(ctx): State<AppContext>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(body): Json<ExtractionRequest>,
) -> Result<Response, AppError> {
    let (body, cached) = match body.validated() {
        Ok(request) => resolve(&ctx, request).await,
        Err(e) => Err(e),
    }
    .map_err(|e| AppError::new(e).with_request_id(request_id))?;

    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        X_CACHE.clone(),
        HeaderValue::from_static(if cached { "hit" } else { "miss" }),
    );
    Ok(response)
}

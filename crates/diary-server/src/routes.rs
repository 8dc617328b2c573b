//! HTTP surface of the blob store.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, ETAG, IF_MATCH},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use diary_core::crypto::KdfParams;
use diary_core::{DiaryError, VersionToken};
use secrecy::SecretString;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::authorize;
use crate::store::{BlobStore, WriteOutcome};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
    pub secret: Arc<SecretString>,
    pub kdf: Arc<KdfParams>,
}

impl AppState {
    pub fn new(store: Arc<dyn BlobStore>, secret: SecretString, kdf: KdfParams) -> Self {
        Self {
            store,
            secret: Arc::new(secret),
            kdf: Arc::new(kdf),
        }
    }

    fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if authorize(presented, &self.secret) {
            Ok(())
        } else {
            warn!(header_present = presented.is_some(), "rejected credential");
            Err(ApiError::Unauthorized)
        }
    }
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/journal", get(read_journal).put(write_journal))
        .route("/journal/kdf", get(kdf_params))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn read_journal(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    state.check(&headers)?;
    let blob = state.store.read().await?;
    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (ETAG, blob.version.to_header()),
        ],
        blob.body,
    )
        .into_response())
}

async fn write_journal(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    state.check(&headers)?;
    // Only `*` (or no header) makes a write unconditional.
    let expected = match headers.get(IF_MATCH) {
        None => None,
        Some(value) => match value.to_str().ok().map(str::trim) {
            Some("*") => None,
            raw => match raw.and_then(VersionToken::from_header) {
                Some(token) => Some(token),
                None => {
                    let current = state.store.read().await?.version;
                    warn!(%current, "write rejected: unusable If-Match");
                    return Err(ApiError::Conflict { current });
                }
            },
        },
    };
    let conditional = expected.is_some();
    let bytes = body.len();

    match state.store.write(body, expected).await? {
        WriteOutcome::Written(version) => {
            info!(bytes, conditional, "journal written");
            Ok((
                [(ETAG, version.to_header())],
                Json(json!({ "success": true })),
            )
                .into_response())
        }
        WriteOutcome::Conflict { current } => {
            warn!(%current, "write rejected: stale version");
            Err(ApiError::Conflict { current })
        }
    }
}

async fn kdf_params(State(state): State<AppState>) -> Json<KdfParams> {
    Json(state.kdf.as_ref().clone())
}

/// Error responses; bodies are `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Conflict { current: VersionToken },
    Internal(DiaryError),
}

impl From<DiaryError> for ApiError {
    fn from(err: DiaryError) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            ApiError::Conflict { current } => (
                StatusCode::PRECONDITION_FAILED,
                [(ETAG, current.to_header())],
                Json(json!({ "error": "Version conflict" })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Storage error" })),
                )
                    .into_response()
            }
        }
    }
}

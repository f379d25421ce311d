//! Avatar library handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::avatars::{AvatarError, DownloadRequest, LocalAvatar};

/// Path reported by `/check-models`, kept for older UI builds.
const LEGACY_MODELS_PATH: &str = "/static/models/";

/// Error body shared by the avatar endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AvatarError {
    fn into_response(self) -> Response {
        let status = match &self {
            AvatarError::InvalidRequest => StatusCode::BAD_REQUEST,
            AvatarError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Remote failures are reported in-body
            AvatarError::Unavailable(_) | AvatarError::Transport(_) => StatusCode::OK,
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckModelsResponse {
    pub models: Vec<String>,
    pub path: String,
}

/// GET /check-models - `.glb` files present locally
pub async fn check_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CheckModelsResponse>, AvatarError> {
    let models = state.avatars.check_models().await?;
    Ok(Json(CheckModelsResponse {
        models,
        path: LEGACY_MODELS_PATH.to_string(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarListResponse {
    pub status: String,
    pub avatars: Vec<LocalAvatar>,
}

/// GET /avatars - downloaded avatars with display names
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AvatarListResponse>, AvatarError> {
    let avatars = state.avatars.list_local().await?;
    Ok(Json(AvatarListResponse {
        status: "ok".to_string(),
        avatars,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub status: String,
    pub message: String,
    pub path: String,
    pub avatar_id: String,
}

/// POST /download-sample-avatar - fetch a catalog or custom avatar
pub async fn download(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<DownloadRequest>>,
) -> Result<Json<DownloadResponse>, AvatarError> {
    let Json(request) = payload.unwrap_or_default();
    let outcome = state.avatars.download(request).await?;

    Ok(Json(DownloadResponse {
        status: "ok".to_string(),
        message: outcome.message,
        path: outcome.path,
        avatar_id: outcome.avatar_id,
    }))
}

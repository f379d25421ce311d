//! Annotation, diagnostics and client log handlers

use std::sync::Arc;

use avatar_models::{Diagnostic, DiagnosticCategory};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: i64,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Body of `POST /adaptar`
#[derive(Debug, Default, Deserialize)]
pub struct AdaptarRequest {
    #[serde(default)]
    pub texto: String,
}

/// Response of `POST /adaptar`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AdaptarResponse {
    Ok {
        texto_adaptado: String,
        modelo: String,
    },
    Error {
        message: String,
        /// Provider HTTP status, when the failure came from a provider response
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<u16>,
    },
}

/// HTTP status a diagnostic is reported with.
///
/// Classified failures travel as `200` with an in-body error. Missing input
/// is `400`. A missing key and unclassified failures are `500`.
pub fn diagnostic_status(diagnostic: &Diagnostic) -> StatusCode {
    match diagnostic.category {
        DiagnosticCategory::BadInput if diagnostic.provider_status.is_none() => {
            StatusCode::BAD_REQUEST
        }
        DiagnosticCategory::NoCredential | DiagnosticCategory::Unexpected => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::OK,
    }
}

/// POST /adaptar - annotate text with emotion markers
pub async fn adaptar(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<AdaptarRequest>>,
) -> (StatusCode, Json<AdaptarResponse>) {
    let Json(request) = payload.unwrap_or_default();
    let key = state.api_key();

    match state.annotator.annotate(&request.texto, key.as_ref()).await {
        Ok(annotation) => (
            StatusCode::OK,
            Json(AdaptarResponse::Ok {
                texto_adaptado: annotation.text,
                modelo: annotation.model,
            }),
        ),
        Err(diagnostic) => {
            let status = diagnostic_status(&diagnostic);
            (
                status,
                Json(AdaptarResponse::Error {
                    code: diagnostic.provider_status,
                    message: diagnostic.message,
                }),
            )
        }
    }
}

/// Response of `GET /test-api`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TestApiResponse {
    Ok {
        key_preview: String,
        modelos_disponibles: Vec<String>,
        total: usize,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        http: Option<u16>,
    },
}

/// GET /test-api - check the configured key and list usable models
///
/// Always answers `200`; the outcome is in the body.
pub async fn test_api(State(state): State<Arc<AppState>>) -> Json<TestApiResponse> {
    let key = state.api_key();

    let response = match state.annotator.list_available_models(key.as_ref()).await {
        Ok(models) => {
            let key_preview = key.map(|k| k.preview()).unwrap_or_default();
            let modelos_disponibles: Vec<String> = models.into_iter().map(|m| m.id).collect();
            TestApiResponse::Ok {
                key_preview,
                total: modelos_disponibles.len(),
                modelos_disponibles,
            }
        }
        Err(diagnostic) => TestApiResponse::Error {
            message: diagnostic.message,
            http: diagnostic.provider_status,
        },
    };

    Json(response)
}

/// Body of `POST /log`
#[derive(Debug, Default, Deserialize)]
pub struct LogRequest {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// POST /log - re-emit a frontend log line
pub async fn log(payload: Option<Json<LogRequest>>) -> Json<StatusResponse> {
    let Json(request) = payload.unwrap_or_default();
    let level = request.level.as_deref().unwrap_or("INFO").to_uppercase();
    let message = request.message.unwrap_or_default();

    match level.as_str() {
        "ERROR" => tracing::error!(target: "client", "{message}"),
        "WARN" | "WARNING" => tracing::warn!(target: "client", "{message}"),
        "DEBUG" => tracing::debug!(target: "client", "{message}"),
        _ => tracing::info!(target: "client", level = %level, "{message}"),
    }

    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

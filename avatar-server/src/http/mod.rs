//! HTTP server module

mod api;
mod avatars;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::AppState;

pub use api::{AdaptarResponse, HealthResponse, TestApiResponse, diagnostic_status};
pub use avatars::{AvatarListResponse, CheckModelsResponse, DownloadResponse, ErrorResponse};

const NO_CACHE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Create the HTTP router with all routes configured
///
/// Downloaded avatars are served under `/avatares`; any other path falls
/// back to files in `static_dir`, with `index.html` for directories.
pub fn create_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    let avatars_dir = state.avatars.dir().to_path_buf();

    Router::new()
        .route("/health", get(api::health))
        .route("/adaptar", post(api::adaptar))
        .route("/test-api", get(api::test_api))
        .route("/log", post(api::log))
        .route("/check-models", get(avatars::check_models))
        .route("/avatars", get(avatars::list))
        .route("/download-sample-avatar", post(avatars::download))
        .nest_service("/avatares", ServeDir::new(avatars_dir))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(NO_CACHE),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::PRAGMA,
                    HeaderValue::from_static("no-cache"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::EXPIRES,
                    HeaderValue::from_static("0"),
                )),
        )
        .with_state(state)
}

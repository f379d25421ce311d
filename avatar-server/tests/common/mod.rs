//! Shared test utilities for avatar-server integration tests

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use avatar_models::Annotator;
use avatar_models::auth::StaticKey;
use avatar_models::providers::{GeminiClient, TransportConfig};
use avatar_server::avatars::{AvatarLibrary, CUSTOM_AVATARS_FILE};
use avatar_server::{AppState, AvatarServer, ServerConfig};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Scripted stand-in for the Generative Language API.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FakeGemini {
    /// Model ids returned by the listing, all generation-capable
    pub models: Vec<String>,
    /// Per-model status and body; models without an entry answer 404
    pub replies: Vec<(String, u16, Value)>,
    /// Models that received a generation call, in order
    pub calls: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl FakeGemini {
    pub fn new(models: &[&str]) -> Self {
        Self {
            models: models.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn reply(mut self, model: &str, status: u16, body: Value) -> Self {
        self.replies.push((model.to_string(), status, body));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

async fn list_models(State(fake): State<FakeGemini>) -> Json<Value> {
    let models: Vec<Value> = fake
        .models
        .iter()
        .map(|m| json!({"name": format!("models/{m}"), "supportedGenerationMethods": ["generateContent"]}))
        .collect();
    Json(json!({ "models": models }))
}

async fn generate(
    State(fake): State<FakeGemini>,
    Path(call): Path<String>,
) -> (StatusCode, Json<Value>) {
    let model = call.trim_end_matches(":generateContent").to_string();
    fake.calls.lock().unwrap().push(model.clone());

    fake.replies
        .iter()
        .find(|(m, _, _)| *m == model)
        .map(|(_, status, body)| {
            (
                StatusCode::from_u16(*status).unwrap(),
                Json(body.clone()),
            )
        })
        .unwrap_or((
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 404, "message": "not found", "status": "NOT_FOUND"}})),
        ))
}

/// Serve `fake` on an ephemeral port, returning its base URL.
#[allow(dead_code)]
pub async fn spawn_fake_gemini(fake: FakeGemini) -> String {
    let router = Router::new()
        .route("/v1beta/models", get(list_models))
        .route("/v1beta/models/:call", post(generate))
        .with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{addr}/v1beta")
}

/// Size of the model served by [`spawn_model_host`], above the skip threshold.
#[allow(dead_code)]
pub const HOSTED_MODEL_SIZE: usize = 150_000;

/// Serve a `.glb` at `/model.glb` and a 404 at `/missing.glb`, returning
/// the base URL.
#[allow(dead_code)]
pub async fn spawn_model_host() -> String {
    let router = Router::new()
        .route("/model.glb", get(|| async { vec![7u8; HOSTED_MODEL_SIZE] }))
        .route("/missing.glb", get(|| async { StatusCode::NOT_FOUND }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{addr}")
}

/// Start an avatar server talking to `base_url`, returns its address.
///
/// The returned directory holds the UI and avatar files and must outlive
/// the test.
pub async fn spawn_avatar_server(base_url: &str, key: Option<&str>) -> (TempDir, SocketAddr) {
    let dir = tempfile::tempdir().unwrap();
    let static_dir = dir.path().join("ui");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<html>avatar</html>").unwrap();

    let client = GeminiClient::new(TransportConfig::with_base_url(base_url)).unwrap();
    let keys = match key {
        Some(key) => StaticKey::new(key),
        None => StaticKey::none(),
    };
    let library = AvatarLibrary::new(
        dir.path().join("avatares"),
        dir.path().join(CUSTOM_AVATARS_FILE),
        false,
    )
    .unwrap();

    let state = Arc::new(AppState::new(
        Annotator::new(Arc::new(client)),
        Arc::new(keys),
        library,
    ));
    let server = AvatarServer::new(ServerConfig::default().with_static_dir(static_dir), state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run_with_listener(listener).await;
    });

    // Brief delay to ensure server is accepting connections
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    (dir, addr)
}

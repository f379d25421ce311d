//! End-to-end annotation through the real HTTP client and a fake provider

mod common;

use common::{FakeGemini, spawn_avatar_server, spawn_fake_gemini};
use serde_json::{Value, json};

const KEY: &str = "AIzaSyE2eTestKey000000";

fn candidate(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
}

async fn post_adaptar(addr: std::net::SocketAddr, texto: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/adaptar"))
        .json(&json!({ "texto": texto }))
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn adaptar_falls_back_to_available_model() {
    let fake = FakeGemini::new(&["gemini-2.5-pro", "gemini-2.0-flash", "gemini-2.0-flash-lite"])
        .reply("gemini-2.5-pro", 200, candidate("(serio) Escucha bien."));
    let calls = fake.calls.clone();
    let base = spawn_fake_gemini(fake).await;
    let (_dir, addr) = spawn_avatar_server(&base, Some(KEY)).await;

    let (status, body) = post_adaptar(addr, "Escucha bien.").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["texto_adaptado"], "(serio) Escucha bien.");
    assert_eq!(body["modelo"], "gemini-2.5-pro");
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["gemini-2.0-flash-lite", "gemini-2.0-flash", "gemini-2.5-pro"]
    );
}

#[tokio::test]
async fn adaptar_stops_on_permission_error() {
    let fake = FakeGemini::new(&["gemini-2.0-flash-lite", "gemini-2.5-flash"]).reply(
        "gemini-2.0-flash-lite",
        403,
        json!({"error": {"code": 403, "message": "API key lacks permission", "status": "PERMISSION_DENIED"}}),
    );
    let calls = fake.calls.clone();
    let base = spawn_fake_gemini(fake).await;
    let (_dir, addr) = spawn_avatar_server(&base, Some(KEY)).await;

    let (status, body) = post_adaptar(addr, "Hola").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], 403);
    assert!(body["message"].as_str().unwrap().contains("API key lacks permission"));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn adaptar_reports_exhaustion() {
    let fake = FakeGemini::new(&["gemini-2.5-flash", "gemini-2.5-pro"]);
    let base = spawn_fake_gemini(fake).await;
    let (_dir, addr) = spawn_avatar_server(&base, Some(KEY)).await;

    let (status, body) = post_adaptar(addr, "Hola").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("Se probaron 2 modelos"));
}

#[tokio::test]
async fn unreachable_provider_is_discovery_failure() {
    // Nothing listens on port 1
    let (_dir, addr) = spawn_avatar_server("http://127.0.0.1:1/v1beta", Some(KEY)).await;

    let (status, body) = post_adaptar(addr, "Hola").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("NO SE PUDIERON LISTAR"));
}

#[tokio::test]
async fn test_api_lists_usable_models() {
    let fake = FakeGemini::new(&["gemini-2.5-flash", "imagen-4.0-generate-001", "gemma-3-12b-it"]);
    let base = spawn_fake_gemini(fake).await;
    let (_dir, addr) = spawn_avatar_server(&base, Some(KEY)).await;

    let body: Value = reqwest::get(format!("http://{addr}/test-api"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["total"], 2);
    assert_eq!(body["modelos_disponibles"], json!(["gemini-2.5-flash", "gemma-3-12b-it"]));
}

#[tokio::test]
async fn serves_ui_index() {
    let (_dir, addr) = spawn_avatar_server("http://127.0.0.1:1/v1beta", None).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["cache-control"],
        "no-store, no-cache, must-revalidate, max-age=0"
    );
    assert!(response.text().await.unwrap().contains("avatar"));
}

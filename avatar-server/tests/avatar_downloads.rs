//! Avatar downloads through the HTTP surface against a local model host

mod common;

use common::{HOSTED_MODEL_SIZE, spawn_avatar_server, spawn_model_host};
use serde_json::{Value, json};

async fn post_download(addr: std::net::SocketAddr, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/download-sample-avatar"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn custom_url_is_downloaded_and_served() {
    let host = spawn_model_host().await;
    // The provider is never called for downloads
    let (dir, addr) = spawn_avatar_server("http://127.0.0.1:1/v1beta", None).await;

    let (status, body) = post_download(
        addr,
        json!({ "custom_url": format!("{host}/model.glb") }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Descargado (0.1 MB)");
    let avatar_id = body["avatar_id"].as_str().unwrap();
    assert!(avatar_id.starts_with("custom_"));
    assert_eq!(body["path"], format!("/avatares/{avatar_id}.glb"));

    let file = dir.path().join("avatares").join(format!("{avatar_id}.glb"));
    assert_eq!(std::fs::metadata(&file).unwrap().len(), HOSTED_MODEL_SIZE as u64);
    assert!(!file.with_extension("glb.part").exists());

    let served = reqwest::get(format!("http://{addr}{}", body["path"].as_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(served.status().as_u16(), 200);
    assert_eq!(served.bytes().await.unwrap().len(), HOSTED_MODEL_SIZE);
}

#[tokio::test]
async fn missing_remote_model_is_reported_in_body() {
    let host = spawn_model_host().await;
    let (dir, addr) = spawn_avatar_server("http://127.0.0.1:1/v1beta", None).await;

    let (status, body) = post_download(
        addr,
        json!({ "custom_url": format!("{host}/missing.glb") }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Error HTTP 404"));
    assert!(message.contains("readyplayer.me"));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("avatares"))
        .unwrap()
        .collect();
    assert!(leftovers.is_empty());
}

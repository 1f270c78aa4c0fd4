mod common;

use bfhl_service::startup::Application;
use common::{no_providers, test_config, TEST_IDENTITY};
use serde_json::{json, Value};

async fn spawn_app() -> String {
    let app = Application::build(test_config(no_providers()))
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());
    tokio::spawn(app.run_until_stopped());
    address
}

#[tokio::test]
async fn test_health_check_works() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "identity": TEST_IDENTITY}));
}

#[tokio::test]
async fn test_bfhl_over_the_wire() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/bfhl", address))
        .json(&json!({"hcf": [24, 36, 60]}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": true, "identity": TEST_IDENTITY, "data": 12})
    );
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, format!("{}/bfhl", address))
        .header("origin", "https://frontend.example.com")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

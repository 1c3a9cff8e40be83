//! End-to-end tests against a live listener.

use mock_endpoint_server::{server, MockConfig};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// Start a server on an ephemeral port and return its base URL.
async fn spawn_app(yaml: &str) -> String {
    let config = MockConfig::from_yaml(yaml).expect("test config must parse");
    let server = std::sync::Arc::new(
        mock_endpoint_server::MockServer::new(config).expect("test config must build"),
    );
    let app = server::router(server);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

const FIXTURE: &str = r#"
routes:
  - method: GET
    path: /api/rate-limit
    status: 429
    body:
      message: "You have reached the rate limit"
      retryAfter: 5
      retryLimit: 3
      rateLimitRemaining: 20
      rateLimitReset: 50

  - method: POST
    path: /api/rate-limit
    status: 429
    echo_request_body: true
    body:
      message: "You have reached the rate limit"
      retryLimit: 3
      rateLimitRemaining: 20
      rateLimitReset: 50

  - method: GET
    path: /api/ping
    status: 422
    body:
      message: "pong"

  - method: GET
    path: /api/wait-room
    status: 200
    delay_seconds: 1
    body:
      message: "You have entered app successfully"
"#;

#[tokio::test]
async fn get_routes_return_literal_status_and_body() {
    let base = spawn_app(FIXTURE).await;

    let response = reqwest::get(format!("{base}/api/ping")).await.unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "pong"}));

    let response = reqwest::get(format!("{base}/api/rate-limit")).await.unwrap();
    assert_eq!(response.status().as_u16(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You have reached the rate limit");
    assert_eq!(body["retryAfter"], 5);
    assert_eq!(body["retryLimit"], 3);
    assert_eq!(body["rateLimitRemaining"], 20);
    assert_eq!(body["rateLimitReset"], 50);
}

#[tokio::test]
async fn post_body_is_echoed_under_sent_body() {
    let base = spawn_app(FIXTURE).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/rate-limit"))
        .json(&json!({"name": "alice"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["sentBody"], json!({"name": "alice"}));
}

#[tokio::test]
async fn malformed_post_body_echoes_empty_object() {
    let base = spawn_app(FIXTURE).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/rate-limit"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["sentBody"], json!({}));
}

#[tokio::test]
async fn undefined_path_returns_404_empty_body() {
    let base = spawn_app(FIXTURE).await;

    let response = reqwest::get(format!("{base}/api/unknown")).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_method_on_known_path_returns_404() {
    let base = spawn_app(FIXTURE).await;

    let client = reqwest::Client::new();
    let response = client
        .delete(format!("{base}/api/ping"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delayed_route_does_not_stall_other_requests() {
    let base = spawn_app(FIXTURE).await;

    let slow = {
        let url = format!("{base}/api/wait-room");
        tokio::spawn(async move {
            let start = Instant::now();
            let response = reqwest::get(url).await.unwrap();
            (response.status().as_u16(), start.elapsed())
        })
    };

    // Give the slow request time to reach its sleep.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let start = Instant::now();
    let response = reqwest::get(format!("{base}/api/ping")).await.unwrap();
    assert_eq!(response.status().as_u16(), 422);
    assert!(
        start.elapsed() < Duration::from_millis(500),
        "ping should not wait behind the delayed route"
    );

    let (status, elapsed) = slow.await.unwrap();
    assert_eq!(status, 200);
    assert!(elapsed >= Duration::from_secs(1));
}

#[tokio::test]
async fn concurrent_identical_requests_get_identical_responses() {
    let base = spawn_app(FIXTURE).await;

    let url = format!("{base}/api/rate-limit");
    let (a, b) = tokio::join!(reqwest::get(url.clone()), reqwest::get(url));

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.status().as_u16(), 429);
    assert_eq!(b.status().as_u16(), 429);

    let body_a: Value = a.json().await.unwrap();
    let body_b: Value = b.json().await.unwrap();
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn duplicate_route_definitions_are_rejected() {
    let yaml = r#"
routes:
  - method: GET
    path: /api/ping
  - method: GET
    path: /api/ping
"#;
    let config = MockConfig::from_yaml(yaml).unwrap();
    assert!(mock_endpoint_server::MockServer::new(config).is_err());
}

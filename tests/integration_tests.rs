//! End-to-end tests against a real server bound to an ephemeral port.
//!
//! Each fixture builds the router from an explicit `Config`, so the API key
//! secret is injected per test and no test touches the process environment.
//!
//! Run with: `cargo test --test integration_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use retail_api_gate::{ApiKeySecret, AppState, Config, build_router};

/// Test fixture that runs the app server in a background task.
struct TestFixture {
    base_url: String,
    client: Client,
}

impl TestFixture {
    /// Start a server whose gate accepts `secret` (empty = unset).
    async fn with_secret(secret: &str) -> Self {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_key: ApiKeySecret::new(secret),
            cors_allowed_origins: vec!["https://shop.example.com".to_string()],
            ..Config::default()
        };

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr: SocketAddr = listener.local_addr().expect("Failed to get local address");

        let app = build_router(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, key: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(key) = key {
            request = request.header("X-API-Key", key);
        }
        request.send().await.expect("Request failed")
    }
}

fn unauthorized_body() -> Value {
    json!({
        "code": 401,
        "status": "UNAUTHORIZED",
        "data": "Invalid or Missing API Key"
    })
}

async fn assert_unauthorized(response: reqwest::Response) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "API-Key"
    );
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, unauthorized_body());
}

// ============================================================================
// Gate Scenarios
// ============================================================================

#[tokio::test]
async fn test_matching_key_proceeds() {
    let fixture = TestFixture::with_secret("abc123").await;

    let response = fixture.get("/api/status", Some("abc123")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 200);
    assert_eq!(body["status"], "OK");
    assert!(body["data"]["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_wrong_case_key_is_rejected() {
    let fixture = TestFixture::with_secret("abc123").await;

    assert_unauthorized(fixture.get("/api/status", Some("ABC123")).await).await;
}

#[tokio::test]
async fn test_unset_secret_rejects_any_key() {
    let fixture = TestFixture::with_secret("").await;

    assert_unauthorized(fixture.get("/api/status", Some("anything")).await).await;
    assert_unauthorized(fixture.get("/api/status", None).await).await;
}

#[tokio::test]
async fn test_missing_header_is_rejected() {
    let fixture = TestFixture::with_secret("abc123").await;

    assert_unauthorized(fixture.get("/api/status", None).await).await;
}

#[tokio::test]
async fn test_near_miss_keys_are_rejected() {
    let fixture = TestFixture::with_secret("abc123").await;

    for key in ["abc12", "abc1234", "xabc123", "abc 123"] {
        let response = fixture.get("/api/status", Some(key)).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{key:?} must be rejected"
        );
    }
}

#[tokio::test]
async fn test_surrounding_whitespace_is_stripped_by_http_parser() {
    let fixture = TestFixture::with_secret("abc123").await;

    // Optional whitespace around a header value is not part of the value
    let response = fixture.get("/api/status", Some("abc123 ")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Whitespace inside the value is
    let response = fixture.get("/api/status", Some("abc 123")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lowercase_header_name_is_accepted() {
    let fixture = TestFixture::with_secret("abc123").await;

    // The web frontend sends the header as `x-api-key`
    let response = fixture
        .client
        .get(fixture.url("/api/status"))
        .header("x-api-key", "abc123")
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Host Routes
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_needs_no_key() {
    let fixture = TestFixture::with_secret("abc123").await;

    let response = fixture.get("/health", None).await;

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "healthy");
    assert!(body["data"].get("version").is_some());
    assert!(body["data"].get("timestamp").is_some());
}

#[tokio::test]
async fn test_rejected_response_carries_request_id() {
    let fixture = TestFixture::with_secret("abc123").await;

    let response = fixture
        .client
        .get(fixture.url("/api/status"))
        .header("X-Request-Id", "trace-me-123")
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-me-123"
    );
}

#[tokio::test]
async fn test_unknown_route_with_key_is_not_found() {
    let fixture = TestFixture::with_secret("abc123").await;

    let response = fixture.get("/api/products", Some("abc123")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 404);
    assert_eq!(body["status"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cors_preflight_allows_api_key_header() {
    let fixture = TestFixture::with_secret("abc123").await;

    let response = fixture
        .client
        .request(reqwest::Method::OPTIONS, fixture.url("/api/status"))
        .header("Origin", "https://shop.example.com")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "x-api-key")
        .send()
        .await
        .expect("Preflight request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "https://shop.example.com"
    );
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("x-api-key"));
}

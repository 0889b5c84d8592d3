//! Health check integration tests for totals-service.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.http_address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "totals-service-test");
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/ready", app.http_address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn metrics_endpoint_works() {
    let app = TestApp::spawn().await;

    // Generate at least one counted request
    app.post_json("/v1/totals", &serde_json::json!({ "items": [] }))
        .await;

    let response = app
        .client
        .get(format!("{}/metrics", app.http_address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap_or("").contains("text/plain"))
        .unwrap_or(false));

    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("totals_requests_total"));
}

#[tokio::test]
async fn metrics_endpoint_reports_per_route_http_metrics() {
    let app = TestApp::spawn().await;

    app.post_json("/v1/totals", &serde_json::json!({ "items": [] }))
        .await;

    let body = app
        .client
        .get(format!("{}/metrics", app.http_address))
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(body.contains("http_requests_total"));
    assert!(body.contains("path=\"/v1/totals\""));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.http_address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
}

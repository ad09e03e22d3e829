//! HTTP tests: POST /events, health and metrics.

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures::{self, INPUT_BUCKET},
    setup::TestContext,
};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

const KEY: &str = "dev1/http/none/data.csv";

#[tokio::test]
async fn test_events_endpoint_processes_notification() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    ctx.upload(KEY, fixtures::ten_row_capture());

    let payload = fixtures::notification(INPUT_BUCKET, &[KEY]);
    let response = server
        .post("/events")
        .content_type("application/json")
        .bytes(payload.to_string().into())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["processed"], 1);

    let result = &body["results"][0];
    assert_eq!(result["key"], KEY);
    assert_eq!(result["device_status"], "new");
    assert_eq!(result["row_count"], 10);
    assert_eq!(result["artifact_key"], "zero_to_one/dev1_http_data.csv");
    assert!(result.get("warning").is_none());

    assert_eq!(ctx.mailer.sent_count(), 1);
}

#[tokio::test]
async fn test_events_endpoint_reports_warnings() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::notification(INPUT_BUCKET, &["dev1/data.csv"]);
    let response = server
        .post("/events")
        .content_type("application/json")
        .bytes(payload.to_string().into())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let result = &body["results"][0];
    assert!(result["warning"]
        .as_str()
        .unwrap()
        .contains("malformed object key"));
    assert!(result["row_count"].is_null());
    assert_eq!(ctx.mailer.sent_count(), 1);
}

#[tokio::test]
async fn test_malformed_json_rejected_without_email() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/events")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "EVENT_001");
    assert_eq!(ctx.mailer.attempts(), 0);
}

#[tokio::test]
async fn test_empty_records_processes_nothing() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/events")
        .content_type("application/json")
        .bytes(r#"{"Records": []}"#.into())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["processed"], 0);
    assert_eq!(ctx.mailer.attempts(), 0);
}

#[tokio::test]
async fn test_send_failure_returns_bad_gateway() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    ctx.upload(KEY, fixtures::ten_row_capture());
    ctx.mailer.set_should_fail(true);

    let payload = fixtures::notification(INPUT_BUCKET, &[KEY]);
    let response = server
        .post("/events")
        .content_type("application/json")
        .bytes(payload.to_string().into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MAIL_001");
}

#[tokio::test]
async fn test_client_disconnect_does_not_cancel_invocation() {
    let ctx = TestContext::new();
    ctx.upload(KEY, fixtures::ten_row_capture());
    ctx.store.set_get_delay(Duration::from_millis(300));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = ctx.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let payload = fixtures::notification(INPUT_BUCKET, &[KEY]).to_string();
    let request = format!(
        "POST /events HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\n\r\n{}",
        addr,
        payload.len(),
        payload
    );

    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(request.as_bytes()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(client);

    // The read is still sleeping when the connection goes away
    let mut waited = Duration::ZERO;
    while ctx.mailer.sent_count() == 0 && waited < Duration::from_secs(3) {
        tokio::time::sleep(Duration::from_millis(50)).await;
        waited += Duration::from_millis(50);
    }

    assert_eq!(ctx.mailer.sent_count(), 1);
    assert!(ctx.artifact("zero_to_one/dev1_http_data.csv").is_some());
}

#[tokio::test]
async fn test_health_endpoint_shape() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["status"].is_string());
    assert!(body["storage_connected"].is_boolean());
    assert!(body["mailer_connected"].is_boolean());
    assert!(body["catalog_connected"].is_boolean());
    assert!(body["in_flight_invocations"].is_u64());
    assert_eq!(body["components"].as_array().map(|c| c.len()), Some(3));
}

#[tokio::test]
async fn test_probe_endpoints() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Readiness depends on the startup bucket probe, which tests never run
    let status = server.get("/health/ready").await.status_code();
    assert!(
        status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE,
        "Ready endpoint should return 200 or 503, got {}",
        status
    );

    server.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn test_metrics_endpoint_counts_invocations() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    ctx.upload(KEY, fixtures::ten_row_capture());

    let payload = fixtures::notification(INPUT_BUCKET, &[KEY]);
    server
        .post("/events")
        .content_type("application/json")
        .bytes(payload.to_string().into())
        .await
        .assert_status_ok();

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["invocations"].as_u64().unwrap() >= 1);
    assert!(body["emails_sent"].as_u64().unwrap() >= 1);
    assert!(body["artifacts_written"].as_u64().unwrap() >= 1);
}

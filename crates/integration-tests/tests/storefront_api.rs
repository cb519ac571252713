//! Integration tests for `/api/arrangements`.

use bloom_integration_tests::{TEST_ANON_KEY, TestApp};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_lists_rows_from_supabase() {
    let supabase = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/arrangements"))
        .and(query_param("select", "*"))
        .and(header("apikey", TEST_ANON_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Midnight Eclipse"},
            {"id": 2, "name": "Neon Pulse"}
        ])))
        .mount(&supabase)
        .await;
    let app = TestApp::builder().supabase(&supabase.uri()).spawn().await;

    let resp = app.get("/api/arrangements").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Response is not JSON");
    assert_eq!(
        body,
        json!({"data": [
            {"id": 1, "name": "Midnight Eclipse"},
            {"id": 2, "name": "Neon Pulse"}
        ]})
    );
}

#[tokio::test]
async fn test_upstream_error_is_reported() {
    let supabase = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/arrangements"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "relation \"arrangements\" does not exist"})),
        )
        .mount(&supabase)
        .await;
    let app = TestApp::builder().supabase(&supabase.uri()).spawn().await;

    let resp = app.get("/api/arrangements").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.expect("Response is not JSON");
    assert_eq!(body["error"], "relation \"arrangements\" does not exist");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_transport_failure_hides_upstream_url() {
    // Nothing listens on a port that was bound and released
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let uri = format!("http://{}", listener.local_addr().expect("No local address"));
    drop(listener);
    let app = TestApp::builder().supabase(&uri).spawn().await;

    let resp = app.get("/api/arrangements").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.expect("Response is not JSON");
    assert_eq!(body["error"], "Failed to fetch arrangements");
}

#[tokio::test]
async fn test_api_is_rate_limited() {
    let app = TestApp::spawn().await;

    let mut limited = false;
    for _ in 0..60 {
        if app.get("/api/arrangements").await.status() == StatusCode::TOO_MANY_REQUESTS {
            limited = true;
            break;
        }
    }

    assert!(limited);
}

#[tokio::test]
async fn test_missing_configuration_is_reported() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/arrangements").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.expect("Response is not JSON");
    assert!(body["error"].is_string());
}

//! Integration tests for the storefront pages.

use bloom_integration_tests::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
async fn test_home_lists_collections_and_arrangements() {
    let app = TestApp::spawn().await;

    let resp = app.get("/").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Haute Floral Atelier"));
    assert!(body.contains("Romantic Roses"));
    assert!(body.contains("Midnight Eclipse"));
    assert!(body.contains("Void Eternal"));
}

#[tokio::test]
async fn test_pages_carry_security_headers_and_nonce() {
    let app = TestApp::spawn().await;

    let resp = app.get("/shop").await;

    let headers = resp.headers().clone();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("x-request-id"));
    let csp = headers["content-security-policy"]
        .to_str()
        .expect("CSP header is not ASCII")
        .to_string();
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .expect("CSP has no nonce");

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains(&format!("nonce=\"{nonce}\"")));
}

#[tokio::test]
async fn test_shop_filters_by_category() {
    let app = TestApp::spawn().await;

    let body = app
        .get("/shop?category=exclusive")
        .await
        .text()
        .await
        .expect("Failed to read body");

    assert!(body.contains("Cyber Bloom"));
    assert!(body.contains("Void Eternal"));
    assert!(!body.contains("Midnight Eclipse"));
}

#[tokio::test]
async fn test_shop_rejects_unknown_category() {
    let app = TestApp::spawn().await;

    let resp = app.get("/shop?category=cacti").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_page() {
    let app = TestApp::spawn().await;

    let resp = app.get("/product/3").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Ethereal Garden"));
    assert!(body.contains("$124.99"));
    assert!(body.contains("You May Also Like"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/product/does-not-exist").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let app = TestApp::spawn().await;

    let resp = app.get("/static/css/main.css").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key("cache-control"));
}

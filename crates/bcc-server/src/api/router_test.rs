use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use bcc_client::ClientSettings;
use bcc_core::Environment;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const STORE: &str = "abc123";

fn config(api_base_url: &str, public_dir: &Path, export_dir: &Path) -> AppConfig {
    AppConfig {
        store_hash: STORE.to_string(),
        access_token: "token".to_string(),
        api_base_url: api_base_url.to_string(),
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "info".to_string(),
        public_dir: public_dir.to_path_buf(),
        export_dir: export_dir.to_path_buf(),
        request_timeout_secs: Some(5),
        page_size: 250,
        page_delay_ms: 0,
        create_delay_ms: 0,
        max_batch: 800,
        conflict_markers: vec!["already exists".to_string(), "conflict".to_string()],
    }
}

struct TestApp {
    router: Router,
    public: TempDir,
    exports: TempDir,
}

fn test_app(api_base_url: &str) -> TestApp {
    let public = tempfile::tempdir().expect("public dir");
    let exports = tempfile::tempdir().expect("export dir");
    std::fs::write(
        public.path().join(PAGE_FILE),
        "<html><body>coupon manager</body></html>",
    )
    .expect("write page");

    let config = config(api_base_url, public.path(), exports.path());
    let client = BigCommerceClient::with_base_url(
        &config.api_base_url,
        &config.store_hash,
        &config.access_token,
        &ClientSettings::from_app_config(&config),
    )
    .expect("client");

    let router = build_app(AppState {
        client: Arc::new(client),
        config: Arc::new(config),
    });
    TestApp {
        router,
        public,
        exports,
    }
}

/// Base URL with nothing listening, so every remote call fails fast.
const DEAD_API: &str = "http://127.0.0.1:1";

async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json parse"))
}

async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> (StatusCode, String) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_unknown_code_maps_to_internal_error() {
    let response = ApiError::new("req-1", "boom", "oops").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_reports_ok_with_request_id() {
    let app = test_app(DEAD_API);
    let (status, json) = get_json(app.router, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert!(json["meta"]["request_id"].as_str().is_some());
}

#[tokio::test]
async fn root_serves_management_page() {
    let app = test_app(DEAD_API);
    let response = app
        .router
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert!(String::from_utf8_lossy(&body).contains("coupon manager"));
}

#[tokio::test]
async fn listing_failures_yield_empty_lists() {
    let app = test_app(DEAD_API);

    let (status, json) = get_json(app.router.clone(), "/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["products"], json!([]));
    assert_eq!(json["data"]["categories"], json!([]));

    let (status, json) = get_json(app.router, "/api/existing-coupons").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["coupons"], json!([]));
}

#[tokio::test]
async fn coupon_routes_reduce_remote_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/stores/{STORE}/v2/coupons")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 4,
            "code": "SAVE10",
            "name": "Save 10",
            "type": "percentage_discount",
            "amount": "10.0000",
            "enabled": true,
            "date_created": "Mon, 05 Jan 2026 10:00:00 +0000",
            "num_uses": 12
        }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/stores/{STORE}/v2/coupons")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (status, json) = get_json(app.router, "/api/coupons").await;

    assert_eq!(status, StatusCode::OK);
    let coupons = json["data"]["coupons"].as_array().expect("coupons array");
    assert_eq!(coupons.len(), 1);
    assert_eq!(coupons[0]["code"], "SAVE10");
    assert_eq!(coupons[0]["type"], "percentage_discount");
    assert!(coupons[0].get("num_uses").is_none());
}

#[tokio::test]
async fn generate_rejects_invalid_parameters() {
    let app = test_app(DEAD_API);
    let (status, body) = post_json(
        app.router,
        "/api/generate-coupons",
        json!({
            "quantity": 801,
            "codePrefix": "GL",
            "namePrefix": "Get Linked",
            "productIds": [1]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn generate_rejects_malformed_body() {
    let app = test_app(DEAD_API);
    let (status, _) = post_json(
        app.router,
        "/api/generate-coupons",
        json!({ "quantity": "lots" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_streams_results_then_completion() {
    let server = MockServer::start().await;
    let coupons = format!("/stores/{STORE}/v2/coupons");
    Mock::given(method("GET"))
        .and(path(coupons.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(coupons.as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "code": "x" })))
        .expect(2)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let export_dir = app.exports.path().to_path_buf();
    let (status, body) = post_json(
        app.router,
        "/api/generate-coupons",
        json!({
            "quantity": 2,
            "codePrefix": "GL",
            "namePrefix": "Get Linked",
            "productIds": [1, 2]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let events: Vec<serde_json::Value> = body
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).expect("event json"))
        .collect();

    assert_eq!(events.len(), 3, "events: {events:?}");
    assert_eq!(events[0]["type"], "result");
    assert_eq!(events[0]["data"]["name"], "Get Linked 1 of 2");
    assert_eq!(events[1]["data"]["status"], "Created");

    let stats = &events[2]["stats"];
    assert_eq!(events[2]["type"], "complete");
    assert_eq!(stats["created"], 2);
    assert_eq!(stats["failed"], 0);
    let filename = stats["filename"].as_str().expect("filename");
    assert_eq!(stats["downloadUrl"], format!("/{filename}"));
    assert!(export_dir.join(filename).exists());
}

#[tokio::test]
async fn create_single_coupon_surfaces_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/stores/{STORE}/v2/coupons")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            { "status": 400, "message": "The field 'amount' is invalid." }
        ])))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (status, body) = post_json(
        app.router,
        "/api/create-single-coupon",
        json!({ "code": "ONE", "discount": 500, "productIds": [1] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["error"]["code"], "create_failed");
    assert!(json["error"]["message"]
        .as_str()
        .expect("message")
        .contains("'amount' is invalid"));
}

#[tokio::test]
async fn download_serves_export_then_removes_it() {
    let app = test_app(DEAD_API);
    let name = "generated-coupons-2026-01-15-1.xlsx";
    let file = app.exports.path().join(name);
    std::fs::write(&file, b"PK fake workbook").expect("write export");

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri(format!("/{name}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{name}\"").as_str()
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&body[..], b"PK fake workbook");

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    assert!(!file.exists());
}

#[tokio::test]
async fn download_rejects_unknown_and_non_export_paths() {
    let app = test_app(DEAD_API);
    std::fs::write(app.public.path().join("secret.xlsx"), b"x").expect("write");

    for uri in ["/missing.xlsx", "/notes.txt", "/..%2Fsecret.xlsx"] {
        let (status, json) = get_json(app.router.clone(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json["error"]["code"], "not_found");
    }
}

use super::*;

fn client(base: &str) -> BigCommerceClient {
    BigCommerceClient::with_base_url(base, "abc123", "token", &ClientSettings::default())
        .expect("client builds")
}

#[test]
fn store_url_appends_store_segment() {
    let url = BigCommerceClient::store_url("https://api.bigcommerce.com", "abc123").unwrap();
    assert_eq!(url.as_str(), "https://api.bigcommerce.com/stores/abc123/");
}

#[test]
fn store_url_tolerates_trailing_slashes() {
    let url = BigCommerceClient::store_url("http://127.0.0.1:9000/", "/abc123/").unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:9000/stores/abc123/");
}

#[test]
fn store_url_rejects_blank_hash() {
    let err = BigCommerceClient::store_url("https://api.bigcommerce.com", "  ").unwrap_err();
    assert!(
        matches!(err, ClientError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}

#[test]
fn store_url_rejects_relative_base() {
    let err = BigCommerceClient::store_url("not-a-url", "abc123").unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}

#[test]
fn endpoint_joins_versioned_paths() {
    let client = client("https://api.bigcommerce.com");
    assert_eq!(
        client.endpoint(Resource::Coupons.path()).unwrap().as_str(),
        "https://api.bigcommerce.com/stores/abc123/v2/coupons"
    );
    assert_eq!(
        client.endpoint(Resource::Categories.path()).unwrap().as_str(),
        "https://api.bigcommerce.com/stores/abc123/v3/catalog/categories"
    );
}

#[test]
fn page_size_is_at_least_one() {
    let settings = ClientSettings {
        page_size: 0,
        ..ClientSettings::default()
    };
    let client =
        BigCommerceClient::with_base_url("https://api.bigcommerce.com", "abc123", "t", &settings)
            .unwrap();
    assert_eq!(client.page_size(), 1);
}

#[test]
fn empty_error_body_falls_back_to_status_line() {
    let raw = raw_from_body("", reqwest::StatusCode::BAD_GATEWAY);
    assert_eq!(normalize_remote_error(&raw), "HTTP 502 Bad Gateway");
}

#[test]
fn non_json_error_body_is_text() {
    let raw = raw_from_body("<html>oops</html>", reqwest::StatusCode::BAD_REQUEST);
    assert!(matches!(raw, RawRemoteError::Text(ref t) if t == "<html>oops</html>"));
}

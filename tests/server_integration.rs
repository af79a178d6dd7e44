//! End-to-end tests for the HTTP front against a mocked pricehistory.app.

use pricehistory_proxy::config::Config;
use pricehistory_proxy::pricehistory::{PriceHistoryClient, ProductRecord, ProductService};
use pricehistory_proxy::server::{self, AppState};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_FIXTURE: &str = include_str!("fixtures/product_page.html");
const PRODUCT_URL: &str = "https://shop.example/item/42";

struct TestApp {
    addr: String,
    upstream: MockServer,
    _static_dir: TempDir,
}

impl TestApp {
    async fn get(&self, path_and_query: &str) -> (u16, String) {
        let client = wreq::Client::builder().build().unwrap();
        let url = format!("http://{}{}", self.addr, path_and_query);
        let response = client.get(url.as_str()).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.text().await.unwrap())
    }
}

async fn spawn_app() -> TestApp {
    let upstream = MockServer::start().await;
    let base_url = upstream.uri();
    spawn_app_with(upstream, base_url, true).await
}

async fn spawn_app_with(upstream: MockServer, base_url: String, with_index: bool) -> TestApp {
    let static_dir = TempDir::new().unwrap();
    let index_path = static_dir.path().join("index.html");
    let template_path = static_dir.path().join("webpage.html");
    if with_index {
        std::fs::write(&index_path, "<h1>Lookup</h1>").unwrap();
    }
    std::fs::write(&template_path, "<main>{{ content | safe }}</main>").unwrap();

    let config = Config { base_url, index_path, template_path, ..Config::default() };

    let client = PriceHistoryClient::new(&config).unwrap();
    let state = AppState::new(ProductService::new(Arc::new(client)), &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(server::serve(listener, state));

    TestApp { addr, upstream, _static_dir: static_dir }
}

async fn mount_search(app: &TestApp, url: &str, response: &str) {
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(serde_json::json!({ "url": url })))
        .respond_with(ResponseTemplate::new(200).set_body_string(response))
        .mount(&app.upstream)
        .await;
}

async fn mount_product(app: &TestApp, slug: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/p/{}", slug)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&app.upstream)
        .await;
}

fn query(url: &str) -> String {
    urlencoding::encode(url).into_owned()
}

#[tokio::test]
async fn test_api_product_requires_url() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/product").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Please provide url");

    let (_, body) = app.get("/api/product?url=").await;
    assert_eq!(body, "Please provide url");
}

#[tokio::test]
async fn test_api_product_success() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"abc123"}"#).await;
    mount_product(&app, "abc123", 200, PRODUCT_FIXTURE).await;

    let (status, body) = app.get(&format!("/api/product?url={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);
    assert!(body.starts_with("{\n  \"slug\": \"abc123\""));
    assert!(body.ends_with("}\n"));

    let record: ProductRecord = serde_json::from_str(&body).unwrap();
    assert_eq!(record.slug, "abc123");
    assert_eq!(record.title, "Acme Widget Pro 2000");
    assert_eq!(record.price, "₹1,499");
    assert_eq!(record.price_history.len(), 3);
    assert_eq!(record.product_info["brand"], "Acme");
}

#[tokio::test]
async fn test_api_product_minimal_page() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"abc123"}"#).await;
    let page = r#"<html><body><div><div class="ph-title">Widget</div></div></body></html>"#;
    mount_product(&app, "abc123", 200, page).await;

    let (_, body) = app.get(&format!("/api/product?url={}", query(PRODUCT_URL))).await;
    let record: ProductRecord = serde_json::from_str(&body).unwrap();
    assert_eq!(record.slug, "abc123");
    assert_eq!(record.title, "Widget");
    assert!(record.price_history.is_empty());
}

#[tokio::test]
async fn test_api_product_slug_not_found() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"error":"nope"}"#).await;

    let (status, body) = app.get(&format!("/api/product?url={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);
    assert_eq!(body, "slug for the given url not found");
}

#[tokio::test]
async fn test_api_product_page_not_found() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"gone"}"#).await;
    mount_product(&app, "gone", 404, "<html>missing</html>").await;

    let (status, body) = app.get(&format!("/api/product?url={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);
    assert_eq!(body, "product not found");
}

#[tokio::test]
async fn test_get_treats_slug_param_as_url() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"abc123"}"#).await;
    mount_product(&app, "abc123", 200, PRODUCT_FIXTURE).await;

    let (status, body) = app.get(&format!("/get?slug={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);

    let record: ProductRecord = serde_json::from_str(&body).unwrap();
    assert_eq!(record.slug, "abc123");
    assert_eq!(record.mrp, "₹2,999");
}

#[tokio::test]
async fn test_resolve_renders_fragment() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"abc123"}"#).await;
    mount_product(&app, "abc123", 200, PRODUCT_FIXTURE).await;

    let (status, body) = app.get(&format!("/resolve?url={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);
    assert!(body.starts_with("<main>"));
    assert!(body.ends_with("</main>"));
    assert!(body.contains("<th>Price:</th>"));
    assert!(body.contains("₹1,499"));
    assert!(!body.contains("&lt;"));
}

#[tokio::test]
async fn test_resolve_without_pricing_row() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"abc123"}"#).await;
    mount_product(&app, "abc123", 200, "<html><body><p>empty</p></body></html>").await;

    let (_, body) = app.get(&format!("/resolve?url={}", query(PRODUCT_URL))).await;
    assert_eq!(body, "<main></main>");
}

#[tokio::test]
async fn test_resolve_error_text() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":7}"#).await;

    let (status, body) = app.get(&format!("/resolve?url={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);
    assert_eq!(body, "slug for the given url not found");
}

#[tokio::test]
async fn test_index_served() {
    let app = spawn_app().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, 200);
    assert_eq!(body, "<h1>Lookup</h1>");

    let (status, body) = app.get("/anything/else").await;
    assert_eq!(status, 200);
    assert_eq!(body, "<h1>Lookup</h1>");
}

#[tokio::test]
async fn test_index_missing_file() {
    let upstream = MockServer::start().await;
    let base_url = upstream.uri();
    let app = spawn_app_with(upstream, base_url, false).await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, 404);
    assert_eq!(body, "404 page not found");
}

#[tokio::test]
async fn test_api_product_repeated_url_uses_first() {
    let app = spawn_app().await;
    mount_search(&app, "first", r#"{"code":"abc123"}"#).await;
    mount_product(&app, "abc123", 200, PRODUCT_FIXTURE).await;

    let (status, body) = app.get("/api/product?url=first&url=second").await;
    assert_eq!(status, 200);

    let record: ProductRecord = serde_json::from_str(&body).unwrap();
    assert_eq!(record.slug, "abc123");
}

#[tokio::test]
async fn test_resolve_repeated_url_is_not_rejected() {
    let app = spawn_app().await;
    mount_search(&app, "first", r#"{}"#).await;

    let (status, body) = app.get("/resolve?url=first&url=second").await;
    assert_eq!(status, 200);
    assert_eq!(body, "slug for the given url not found");
}

#[tokio::test]
async fn test_get_error_text() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"gone"}"#).await;
    mount_product(&app, "gone", 404, "").await;

    let (status, body) = app.get(&format!("/get?slug={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);
    assert_eq!(body, "product not found");
}

#[tokio::test]
async fn test_get_without_slug() {
    let app = spawn_app().await;
    mount_search(&app, "", r#"{}"#).await;

    let (status, body) = app.get("/get").await;
    assert_eq!(status, 200);
    assert_eq!(body, "slug for the given url not found");
}

#[tokio::test]
async fn test_api_product_follows_upstream_redirect() {
    let app = spawn_app().await;
    mount_search(&app, PRODUCT_URL, r#"{"code":"old"}"#).await;
    Mock::given(method("GET"))
        .and(path("/p/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/p/abc123"))
        .mount(&app.upstream)
        .await;
    mount_product(&app, "abc123", 200, PRODUCT_FIXTURE).await;

    let (status, body) = app.get(&format!("/api/product?url={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);

    let record: ProductRecord = serde_json::from_str(&body).unwrap();
    assert_eq!(record.slug, "old");
    assert_eq!(record.title, "Acme Widget Pro 2000");
}

#[tokio::test]
async fn test_upstream_unreachable() {
    // Nothing listens on port 9 (discard) on test machines
    let upstream = MockServer::start().await;
    let app = spawn_app_with(upstream, "http://127.0.0.1:9".to_string(), true).await;

    let (status, body) = app.get(&format!("/api/product?url={}", query(PRODUCT_URL))).await;
    assert_eq!(status, 200);
    assert!(body.starts_with("network error"));
}

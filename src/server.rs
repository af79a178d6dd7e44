//! HTTP front for product lookups.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/resolve?url=` | Pricing fragment of the resolved product, rendered into the page template |
//! | `GET`  | `/get?slug=` | Product JSON; `slug` is resolved as a URL first |
//! | `GET`  | `/api/product?url=` | Product JSON for a product URL |
//! | `GET`  | `/` | Static index page |
//!
//! Lookup failures are written back as plain text with status 200.

use crate::config::Config;
use crate::pricehistory::{PriceHistoryClient, ProductRecord, ProductService};
use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Shared state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    service: ProductService,
    index_path: Arc<PathBuf>,
    template_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(service: ProductService, config: &Config) -> Self {
        Self {
            service,
            index_path: Arc::new(config.index_path.clone()),
            template_path: Arc::new(config.template_path.clone()),
        }
    }
}

/// Builds the router with every endpoint registered.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/resolve", get(handle_resolve))
        .route("/get", get(handle_get))
        .route("/api/product", get(handle_api_product))
        .route("/", get(handle_index))
        .fallback(handle_index)
        .with_state(state)
}

/// Starts the HTTP server on the configured bind address.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let client = PriceHistoryClient::new(config).context("Failed to create HTTP client")?;
    let service = ProductService::new(Arc::new(client));
    let state = AppState::new(service, config);

    info!("Starting server...");

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    serve(listener, state).await
}

/// Serves the router on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Raw query pairs. Repeated keys are kept, so no query string is rejected.
type Params = Query<Vec<(String, String)>>;

/// First value of `key`, or empty when absent.
fn first_param<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str()).unwrap_or_default()
}

/// Handler for `GET /resolve`.
async fn handle_resolve(State(state): State<AppState>, Query(params): Params) -> Response {
    let slug = match state.service.resolve(first_param(&params, "url")).await {
        Ok(slug) => slug,
        Err(e) => return failure("/resolve", e),
    };

    let fragment = match state.service.get_fragment(&slug).await {
        Ok(fragment) => fragment,
        Err(e) => return failure("/resolve", e),
    };

    match render_page(&state.template_path, &String::from_utf8_lossy(&fragment)).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!("Failed to render {}: {:#}", state.template_path.display(), e);
            format!("{:#}", e).into_response()
        }
    }
}

/// Handler for `GET /get`. The `slug` parameter is resolved as a product URL.
async fn handle_get(State(state): State<AppState>, Query(params): Params) -> Response {
    match state.service.get_by_url(first_param(&params, "slug")).await {
        Ok(record) => json_response(&record),
        Err(e) => failure("/get", e),
    }
}

/// Handler for `GET /api/product`.
async fn handle_api_product(State(state): State<AppState>, Query(params): Params) -> Response {
    let url = first_param(&params, "url");
    if url.is_empty() {
        return "Please provide url".into_response();
    }

    match state.service.get_by_url(url).await {
        Ok(record) => json_response(&record),
        Err(e) => failure("/api/product", e),
    }
}

/// Handler for `GET /` and unmatched paths.
async fn handle_index(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.index_path.as_path()).await {
        Ok(body) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response(),
        Err(e) => {
            warn!("Cannot read {}: {}", state.index_path.display(), e);
            (StatusCode::NOT_FOUND, "404 page not found").into_response()
        }
    }
}

/// Renders the fragment into the page template's `content` slot without escaping.
async fn render_page(template_path: &Path, fragment: &str) -> anyhow::Result<String> {
    let source = tokio::fs::read_to_string(template_path)
        .await
        .with_context(|| format!("Failed to read template: {}", template_path.display()))?;

    let mut context = tera::Context::new();
    context.insert("content", fragment);

    tera::Tera::one_off(&source, &context, true)
        .with_context(|| format!("Failed to render template: {}", template_path.display()))
}

fn json_response(record: &ProductRecord) -> Response {
    match record.to_pretty_json() {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => failure("json", e),
    }
}

/// Writes the error text as the body, keeping status 200.
fn failure(route: &str, err: impl Display) -> Response {
    let message = err.to_string();
    warn!("{} failed: {}", route, message);
    message.into_response()
}

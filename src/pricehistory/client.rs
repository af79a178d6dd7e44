//! HTTP client for pricehistory.app using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::error::{Error, Result};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use wreq::redirect::Policy;
use wreq::Client;
use wreq_util::Emulation;

/// Trait for pricehistory.app lookups - enables mocking for tests.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Resolves a product URL into the site's slug via the search endpoint.
    async fn resolve(&self, url: &str) -> Result<String>;

    /// Fetches the product page HTML for a slug.
    async fn product_page(&self, slug: &str) -> Result<String>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    url: &'a str,
}

/// Search endpoint response. Only `code` is read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    code: Option<Value>,
}

impl SearchResponse {
    fn into_slug(self) -> Result<String> {
        match self.code {
            Some(Value::String(slug)) => Ok(slug),
            _ => Err(Error::slug_not_found()),
        }
    }
}

/// pricehistory.app HTTP client with browser impersonation.
pub struct PriceHistoryClient {
    client: Client,
    base_url: String,
}

impl PriceHistoryClient {
    /// Creates a new client from the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/api/search", self.base_url)
    }

    fn product_url(&self, slug: &str) -> String {
        format!("{}/p/{}", self.base_url, urlencoding::encode(slug))
    }
}

#[async_trait]
impl PriceHistorySource for PriceHistoryClient {
    async fn resolve(&self, url: &str) -> Result<String> {
        let body = serde_json::to_string(&SearchRequest { url })?;
        let search_url = self.search_url();

        info!("Resolving slug for: {}", url);
        debug!("POST {}", search_url);

        let response = self
            .client
            .post(search_url.as_str())
            .emulation(Emulation::Chrome131)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await
            .map_err(Error::Network)?;

        debug!("Response status: {}", response.status());

        let text = response.text().await.map_err(Error::Network)?;
        let search: SearchResponse = serde_json::from_str(&text)?;
        search.into_slug()
    }

    async fn product_page(&self, slug: &str) -> Result<String> {
        let url = self.product_url(slug);

        info!("Fetching product: {}", slug);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status != 200 {
            return Err(Error::product_not_found());
        }

        response.text().await.map_err(Error::Parse)
    }
}

//! Lookup operations composed from the site client and the page parser.

use crate::error::Result;
use crate::pricehistory::client::PriceHistorySource;
use crate::pricehistory::models::{ExtractionReport, ProductRecord};
use crate::pricehistory::parser;
use std::sync::Arc;
use tracing::debug;

/// Callback receiving the slug and extraction report of every parsed page.
pub type MissHook = Arc<dyn Fn(&str, &ExtractionReport) + Send + Sync>;

/// Resolves, fetches and extracts products. Holds no per-request state.
#[derive(Clone)]
pub struct ProductService {
    source: Arc<dyn PriceHistorySource>,
    miss_hook: Option<MissHook>,
}

impl ProductService {
    pub fn new(source: Arc<dyn PriceHistorySource>) -> Self {
        Self { source, miss_hook: None }
    }

    /// Installs a diagnostic hook called after each extraction.
    pub fn with_miss_hook(mut self, hook: MissHook) -> Self {
        self.miss_hook = Some(hook);
        self
    }

    /// Resolves a product URL into a slug.
    pub async fn resolve(&self, url: &str) -> Result<String> {
        self.source.resolve(url).await
    }

    /// Fetches and extracts the product page for a slug.
    pub async fn get(&self, slug: &str) -> Result<ProductRecord> {
        let html = self.source.product_page(slug).await?;
        let extraction = parser::extract(&html, slug);

        if !extraction.report.is_clean() {
            debug!("Selector misses for {}: {:?}", slug, extraction.report.misses);
        }
        if let Some(hook) = &self.miss_hook {
            hook(slug, &extraction.report);
        }

        Ok(extraction.record)
    }

    /// Resolves a product URL and fetches its record.
    pub async fn get_by_url(&self, url: &str) -> Result<ProductRecord> {
        let slug = self.resolve(url).await?;
        self.get(&slug).await
    }

    /// Fetches the embeddable pricing fragment for a slug.
    pub async fn get_fragment(&self, slug: &str) -> Result<Vec<u8>> {
        let html = self.source.product_page(slug).await?;
        Ok(parser::parse_price_fragment(&html).into_bytes())
    }
}

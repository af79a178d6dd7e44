//! Product lookup command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::pricehistory::{PriceHistoryClient, PriceHistorySource, ProductService};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Fetches a product by slug or by product URL and formats it.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn service(&self) -> Result<ProductService> {
        let client = PriceHistoryClient::new(&self.config).context("Failed to create HTTP client")?;
        Ok(ProductService::new(Arc::new(client)))
    }

    /// Fetches a product by slug and returns formatted output.
    pub async fn execute(&self, slug: &str) -> Result<String> {
        self.execute_with_source(self.service()?, slug).await
    }

    /// Fetches a product by slug with a provided source (for testing).
    pub async fn execute_with_source(&self, service: ProductService, slug: &str) -> Result<String> {
        let slug = slug.trim();
        if slug.is_empty() {
            anyhow::bail!("Slug must not be empty");
        }

        info!("Looking up product: {}", slug);

        let record = service.get(slug).await?;
        Ok(Formatter::new(self.config.format).format_record(&record))
    }

    /// Resolves a product URL, fetches the product and returns formatted output.
    pub async fn lookup(&self, url: &str) -> Result<String> {
        self.lookup_with_source(self.service()?, url).await
    }

    /// Resolves and fetches with a provided source (for testing).
    pub async fn lookup_with_source(&self, service: ProductService, url: &str) -> Result<String> {
        info!("Looking up product URL: {}", url);

        let record = service.get_by_url(url).await?;
        Ok(Formatter::new(self.config.format).format_record(&record))
    }

    /// Resolves a product URL into its slug.
    pub async fn resolve(&self, url: &str) -> Result<String> {
        let client = PriceHistoryClient::new(&self.config).context("Failed to create HTTP client")?;
        self.resolve_with_source(&client, url).await
    }

    /// Resolves with a provided source (for testing).
    pub async fn resolve_with_source(
        &self,
        source: &impl PriceHistorySource,
        url: &str,
    ) -> Result<String> {
        Ok(source.resolve(url).await?)
    }
}

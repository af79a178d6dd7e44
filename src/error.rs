//! Errors returned by lookups against pricehistory.app.
//!
//! The `Display` text of each variant is what the HTTP front writes back to
//! the caller, so the not-found messages are kept short and stable.

use thiserror::Error;

/// Message for a product page that did not answer with 200.
pub const PRODUCT_NOT_FOUND: &str = "product not found";

/// Message for a search response without a usable `code` field.
pub const SLUG_NOT_FOUND: &str = "slug for the given url not found";

/// Error type for resolve and fetch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-200 product page or missing slug code.
    #[error("{0}")]
    NotFound(String),
    /// The site could not be reached.
    #[error("network error: {0}")]
    Network(#[source] wreq::Error),
    /// The product page body could not be read.
    #[error("failed to read product page: {0}")]
    Parse(#[source] wreq::Error),
    /// The search endpoint answered with something other than JSON.
    #[error("invalid search response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub fn product_not_found() -> Self {
        Self::NotFound(PRODUCT_NOT_FOUND.to_string())
    }

    pub fn slug_not_found() -> Self {
        Self::NotFound(SLUG_NOT_FOUND.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Convenient alias for lookup results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

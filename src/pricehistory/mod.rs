//! pricehistory.app modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;
pub mod service;

pub use client::{PriceHistoryClient, PriceHistorySource};
pub use models::{ExtractionReport, PriceHistoryEntry, ProductRecord};
pub use service::{MissHook, ProductService};

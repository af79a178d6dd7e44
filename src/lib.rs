//! pricehistory-proxy - pricehistory.app scraper and HTTP front
//!
//! Resolves product URLs to pricehistory.app slugs, scrapes product pages
//! into structured records, and serves them as JSON or embeddable HTML.

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod pricehistory;
pub mod server;

pub use config::Config;
pub use error::Error;
pub use pricehistory::{PriceHistoryEntry, ProductRecord, ProductService};

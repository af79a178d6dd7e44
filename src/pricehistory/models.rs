//! Data models for scraped pricehistory.app product pages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product scraped from a pricehistory.app page.
///
/// Every field is filled opportunistically: a selector that matches nothing
/// leaves its field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Site identifier the page was fetched with
    pub slug: String,
    /// Product title
    pub title: String,
    /// Product image URL
    pub image: String,
    /// Current price, formatted as scraped
    pub price: String,
    /// Historical price observations in page order
    pub price_history: Vec<PriceHistoryEntry>,
    /// Maximum retail price
    pub mrp: String,
    /// Discount, formatted as scraped
    pub discount: String,
    /// Free-form attribute table keyed by normalized header text
    pub product_info: BTreeMap<String, String>,
}

impl ProductRecord {
    /// Creates an empty record for the given slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into(), ..Self::default() }
    }

    /// Returns true if a pricing table was found on the page.
    pub fn has_pricing(&self) -> bool {
        !(self.price.is_empty() && self.mrp.is_empty() && self.discount.is_empty())
    }

    /// Serializes the record as two-space indented JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// One row of the price history table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    /// Normalized row label, e.g. `lowest_price`
    #[serde(rename = "type")]
    pub kind: String,
    /// Price text with the date stripped out
    pub value: String,
    /// Date text
    pub date: String,
}

/// Extraction steps that found nothing on a page.
///
/// Misses are never errors; the report only feeds diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub misses: Vec<&'static str>,
}

impl ExtractionReport {
    pub(crate) fn miss(&mut self, step: &'static str) {
        self.misses.push(step);
    }

    /// Number of extraction steps that found nothing.
    pub fn miss_count(&self) -> usize {
        self.misses.len()
    }

    pub fn is_clean(&self) -> bool {
        self.misses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_record() -> ProductRecord {
        let mut record = ProductRecord::new("abc123");
        record.title = "Widget".to_string();
        record.price = "₹499".to_string();
        record.mrp = "₹999".to_string();
        record.discount = "50%".to_string();
        record.price_history.push(PriceHistoryEntry {
            kind: "lowest_price".to_string(),
            value: "₹399".to_string(),
            date: "Jan 1, 2024".to_string(),
        });
        record.product_info.insert("brand".to_string(), "Acme".to_string());
        record
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = ProductRecord::new("abc123");
        assert_eq!(record.slug, "abc123");
        assert!(record.title.is_empty());
        assert!(record.price_history.is_empty());
        assert!(record.product_info.is_empty());
        assert!(!record.has_pricing());
    }

    #[test]
    fn test_has_pricing() {
        let record = make_test_record();
        assert!(record.has_pricing());

        let mut record = ProductRecord::new("x");
        record.discount = "10%".to_string();
        assert!(record.has_pricing());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&make_test_record()).unwrap();
        assert!(json.contains("\"slug\":\"abc123\""));
        assert!(json.contains("\"price_history\":[{\"type\":\"lowest_price\""));
        assert!(json.contains("\"mrp\":\"₹999\""));
        assert!(json.contains("\"product_info\":{\"brand\":\"Acme\"}"));
    }

    #[test]
    fn test_json_field_order() {
        let json = serde_json::to_string(&ProductRecord::new("a")).unwrap();
        assert_eq!(
            json,
            r#"{"slug":"a","title":"","image":"","price":"","price_history":[],"mrp":"","discount":"","product_info":{}}"#
        );
    }

    #[test]
    fn test_pretty_json_indent() {
        let json = make_test_record().to_pretty_json().unwrap();
        assert!(json.starts_with("{\n  \"slug\": \"abc123\""));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_product_info_sorted_keys() {
        let mut record = ProductRecord::new("a");
        record.product_info.insert("zeta".to_string(), "1".to_string());
        record.product_info.insert("alpha".to_string(), "2".to_string());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.find("alpha").unwrap() < json.find("zeta").unwrap());
    }

    #[test]
    fn test_extraction_report() {
        let mut report = ExtractionReport::default();
        assert!(report.is_clean());
        report.miss("title");
        report.miss("image");
        assert_eq!(report.miss_count(), 2);
        assert_eq!(report.misses, vec!["title", "image"]);
    }
}

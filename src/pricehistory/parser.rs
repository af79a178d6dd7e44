//! HTML parser for pricehistory.app product pages.

use crate::pricehistory::models::{ExtractionReport, PriceHistoryEntry, ProductRecord};
use crate::pricehistory::selectors::{self, PRICE_MARKER};
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// A parsed record together with the steps that found nothing.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: ProductRecord,
    pub report: ExtractionReport,
}

/// Parses a product page into a record. Selector misses leave fields empty.
pub fn parse_product_page(html: &str, slug: &str) -> ProductRecord {
    extract(html, slug).record
}

/// Parses a product page and reports which extraction steps found nothing.
pub fn extract(html: &str, slug: &str) -> Extraction {
    let document = Html::parse_document(html);
    let mut record = ProductRecord::new(slug);
    let mut report = ExtractionReport::default();

    match parse_title(&document) {
        Some(title) => record.title = title,
        None => report.miss("title"),
    }

    match parse_image(&document) {
        Some(image) => record.image = image,
        None => report.miss("image"),
    }

    let tables: Vec<ElementRef> = document.select(&selectors::TABLE).collect();

    match tables.first() {
        Some(table) => record.price_history = parse_price_history(*table),
        None => report.miss("price_history"),
    }

    match tables.last() {
        Some(table) => record.product_info = parse_product_info(*table),
        None => report.miss("product_info"),
    }

    match tables.iter().find(|t| text_of(**t).contains(PRICE_MARKER)) {
        Some(table) => {
            let [price, mrp, discount] = pricing_cells(*table);
            record.price = price.unwrap_or_default();
            record.mrp = mrp.unwrap_or_default();
            record.discount = discount.unwrap_or_default();
        }
        None => report.miss("pricing_table"),
    }

    debug!(
        "Parsed {}: {} history rows, {} info rows, {} misses",
        slug,
        record.price_history.len(),
        record.product_info.len(),
        report.miss_count()
    );

    Extraction { record, report }
}

/// Returns the inner HTML of the first layout row mentioning the price, or
/// an empty string when there is none.
pub fn parse_price_fragment(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .select(&selectors::LAYOUT_ROW)
        .find(|row| text_of(*row).contains(PRICE_MARKER))
        .map(|row| row.inner_html())
        .unwrap_or_default()
}

fn parse_title(document: &Html) -> Option<String> {
    document.select(&selectors::TITLE).next().map(|e| text_of(e).trim().to_string())
}

fn parse_image(document: &Html) -> Option<String> {
    document
        .select(&selectors::IMAGE_CARD)
        .next()?
        .select(&selectors::IMAGE)
        .next()?
        .value()
        .attr("src")
        .map(String::from)
}

/// Reads every row of the history table into `{type, value, date}` entries.
fn parse_price_history(table: ElementRef) -> Vec<PriceHistoryEntry> {
    table
        .select(&selectors::ROW)
        .map(|row| {
            let kind = normalize_key(&cells_text(row, &selectors::HEADER_CELL));
            let value = cells_text(row, &selectors::DATA_CELL).trim().to_string();
            let date = following_cells_text(row).trim().to_string();
            let value = strip_date(&value, &date);

            trace!("History row: {} = {} ({})", kind, value, date);
            PriceHistoryEntry { kind, value, date }
        })
        .collect()
}

/// Reads every row of the info table into a map. Later keys overwrite earlier ones.
fn parse_product_info(table: ElementRef) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();
    for row in table.select(&selectors::ROW) {
        let key = normalize_key(&cells_text(row, &selectors::HEADER_CELL));
        let value = cells_text(row, &selectors::DATA_CELL).trim().to_string();
        info.insert(key, value);
    }
    info
}

/// Positional layout of the pricing table: price, MRP, discount.
pub fn pricing_cells(table: ElementRef) -> [Option<String>; 3] {
    let mut cells = table.select(&selectors::DATA_CELL).map(|td| text_of(td).trim().to_string());
    [cells.next(), cells.next(), cells.next()]
}

/// Removes a date that leaked into the value cell text.
fn strip_date(value: &str, date: &str) -> String {
    if date.is_empty() {
        return value.to_string();
    }
    value.replace(date, "").trim().to_string()
}

/// Lower-cases header text and joins words with underscores.
fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn text_of(element: ElementRef) -> String {
    element.text().collect()
}

fn cells_text(row: ElementRef, selector: &scraper::Selector) -> String {
    row.select(selector).map(text_of).collect()
}

/// Text of the element immediately following each data cell in a row.
fn following_cells_text(row: ElementRef) -> String {
    row.select(&selectors::DATA_CELL)
        .filter_map(|td| td.next_siblings().find_map(ElementRef::wrap))
        .map(text_of)
        .collect()
}

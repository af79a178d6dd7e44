//! CSS selectors for pricehistory.app product pages.
//!
//! All selectors used for parsing live here. Update this file when the site
//! changes its HTML structure.
//!
//! **Update process**: when a field comes back empty, capture the page,
//! update the selector, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Marker text identifying the pricing table and pricing row.
pub static PRICE_MARKER: &str = "Price:";

/// Product title.
pub static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div .ph-title, div.ph-title").unwrap());

/// Card wrapping the product image.
pub static IMAGE_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div .card-img, div.card-img").unwrap());

/// Image inside the image card.
pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Any table on the page.
pub static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

/// Table row.
pub static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

/// Header cell.
pub static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());

/// Data cell.
pub static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Layout rows scanned for the embeddable pricing fragment.
pub static LAYOUT_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div .row, div.row").unwrap());

pub mod fields;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::error::FieldError;
use crate::record::{ProductRecord, ResultSet};

static CARD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.card-body").unwrap());

/// Records kept from one page plus how many cards were seen and dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractReport {
    pub records: ResultSet,
    pub matched: usize,
    pub skipped: usize,
}

/// Parse a listing page into records, one per product card, in document order.
/// A card whose fields fail to parse is dropped whole.
pub fn parse_listing(html: &str) -> ExtractReport {
    let doc = Html::parse_document(html);
    let mut report = ExtractReport::default();

    for (idx, card) in doc.select(&CARD_SEL).enumerate() {
        report.matched += 1;
        match extract_card(card) {
            Ok(record) => report.records.push(record),
            Err(e) => {
                debug!(card = idx, "Skipping card: {}", e);
                report.skipped += 1;
            }
        }
    }

    info!(
        "Matched {} cards, kept {} records",
        report.matched,
        report.records.len()
    );
    if report.skipped > 0 {
        warn!("Skipped {} malformed cards", report.skipped);
    }
    report
}

/// All-or-nothing: the first field error aborts this card.
pub fn extract_card(card: ElementRef<'_>) -> Result<ProductRecord, FieldError> {
    Ok(ProductRecord {
        name: fields::name_or_default(card)?,
        price: fields::price_or_default(card)?,
        description: fields::description_or_default(card)?,
        rating: fields::rating_or_default(card)?,
        review_count: fields::review_count_or_default(card)?,
    })
}

// ── Tests ──

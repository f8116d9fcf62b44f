use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::error::FieldError;
use crate::record::MISSING_TEXT;

static NAME_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.title").unwrap());
static PRICE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h4.price").unwrap());
static DESC_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.description").unwrap());
static RATING_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p[data-rating]").unwrap());
static REVIEWS_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.review-count").unwrap());

/// Result of probing one field: `Ok(None)` means the element was absent,
/// `Err` means it was present but unusable.
pub type Probe<T> = Result<Option<T>, FieldError>;

/// Default substitution for absent fields. Parse failures pass through.
pub trait Fallback<T> {
    fn or_fallback(self, default: impl FnOnce() -> T) -> Result<T, FieldError>;
}

impl<T> Fallback<T> for Probe<T> {
    fn or_fallback(self, default: impl FnOnce() -> T) -> Result<T, FieldError> {
        self.map(|found| found.unwrap_or_else(default))
    }
}

// ── Probes ──

/// `a.title[title]`. An anchor without the attribute yields an empty name.
pub fn name(card: ElementRef<'_>) -> Probe<String> {
    Ok(first(card, &NAME_SEL).map(|a| a.value().attr("title").unwrap_or("").to_string()))
}

pub fn price(card: ElementRef<'_>) -> Probe<f64> {
    first(card, &PRICE_SEL)
        .map(|el| parse_price(&text_of(el)))
        .transpose()
}

pub fn description(card: ElementRef<'_>) -> Probe<String> {
    Ok(first(card, &DESC_SEL).map(text_of))
}

pub fn rating(card: ElementRef<'_>) -> Probe<i64> {
    first(card, &RATING_SEL)
        .and_then(|p| p.value().attr("data-rating"))
        .map(parse_rating)
        .transpose()
}

pub fn review_count(card: ElementRef<'_>) -> Probe<u64> {
    first(card, &REVIEWS_SEL)
        .map(|el| parse_review_count(&text_of(el)))
        .transpose()
}

// ── Defaults applied ──

pub fn name_or_default(card: ElementRef<'_>) -> Result<String, FieldError> {
    name(card).or_fallback(|| MISSING_TEXT.to_string())
}

pub fn price_or_default(card: ElementRef<'_>) -> Result<f64, FieldError> {
    price(card).or_fallback(|| 0.0)
}

pub fn description_or_default(card: ElementRef<'_>) -> Result<String, FieldError> {
    description(card).or_fallback(|| MISSING_TEXT.to_string())
}

pub fn rating_or_default(card: ElementRef<'_>) -> Result<i64, FieldError> {
    rating(card).or_fallback(|| 0)
}

pub fn review_count_or_default(card: ElementRef<'_>) -> Result<u64, FieldError> {
    review_count(card).or_fallback(|| 0)
}

// ── Text parsing ──

/// "$1,199.99" -> 1199.99. Rejects negatives and non-finite values.
pub fn parse_price(text: &str) -> Result<f64, FieldError> {
    let cleaned = text.replace(['$', ','], "");
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(FieldError::Price {
            raw: text.to_string(),
        }),
    }
}

pub fn parse_rating(raw: &str) -> Result<i64, FieldError> {
    raw.trim().parse::<i64>().map_err(|_| FieldError::Rating {
        raw: raw.to_string(),
    })
}

/// Leading numeral of "12 reviews". Blank text counts as zero.
pub fn parse_review_count(text: &str) -> Result<u64, FieldError> {
    match text.split_whitespace().next() {
        None => Ok(0),
        Some(token) => token.parse::<u64>().map_err(|_| FieldError::Reviews {
            raw: text.to_string(),
        }),
    }
}

fn first<'a>(card: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    card.select(sel).next()
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Tests ──

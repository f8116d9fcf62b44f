use std::cmp::Ordering;

use super::NumericField;
use crate::record::{ProductRecord, ResultSet};

/// Table sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Rating,
    Reviews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// `rating / (price / 100)`. Zero or negative prices have no score and are
/// left out of value rankings.
pub fn value_score(record: &ProductRecord) -> Option<f64> {
    (record.price > 0.0).then(|| record.rating as f64 / (record.price / 100.0))
}

/// The `n` largest by `field`, descending. Ties keep their original order.
pub fn top_n_by(records: &[ProductRecord], field: NumericField, n: usize) -> ResultSet {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| field.of(b).total_cmp(&field.of(a)));
    sorted.truncate(n);
    sorted
}

/// The `n` best value scores. Records without a score are excluded.
pub fn best_value(records: &[ProductRecord], n: usize) -> Vec<(ProductRecord, f64)> {
    let mut scored: Vec<(ProductRecord, f64)> = records
        .iter()
        .filter_map(|r| value_score(r).map(|s| (r.clone(), s)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(n);
    scored
}

/// Stable sort for the data table.
pub fn sort_by(records: &[ProductRecord], key: SortKey, order: Order) -> ResultSet {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match order {
            Order::Ascending => ord,
            Order::Descending => ord.reverse(),
        }
    });
    sorted
}

fn compare(a: &ProductRecord, b: &ProductRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::Rating => a.rating.cmp(&b.rating),
        SortKey::Reviews => a.review_count.cmp(&b.review_count),
    }
}

use std::collections::BTreeSet;

use crate::record::{ProductRecord, ResultSet};

/// Price window (inclusive both ends) and the ratings to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub price_min: f64,
    pub price_max: f64,
    pub ratings: BTreeSet<i64>,
}

impl FilterSpec {
    /// The filter that keeps every record of `records`.
    /// `None` when there is nothing to bound.
    pub fn covering(records: &[ProductRecord]) -> Option<Self> {
        let (price_min, price_max) = price_bounds(records)?;
        Some(FilterSpec {
            price_min,
            price_max,
            ratings: distinct_ratings(records),
        })
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        self.price_min <= record.price
            && record.price <= self.price_max
            && self.ratings.contains(&record.rating)
    }

    pub fn apply(&self, records: &[ProductRecord]) -> ResultSet {
        filter(records, self.price_min, self.price_max, &self.ratings)
    }
}

/// Keep records with `price_min <= price <= price_max` and an allowed rating.
pub fn filter(
    records: &[ProductRecord],
    price_min: f64,
    price_max: f64,
    allowed_ratings: &BTreeSet<i64>,
) -> ResultSet {
    records
        .iter()
        .filter(|r| price_min <= r.price && r.price <= price_max)
        .filter(|r| allowed_ratings.contains(&r.rating))
        .cloned()
        .collect()
}

pub fn price_bounds(records: &[ProductRecord]) -> Option<(f64, f64)> {
    let mut prices = records.iter().map(|r| r.price);
    let first = prices.next()?;
    Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

pub fn distinct_ratings(records: &[ProductRecord]) -> BTreeSet<i64> {
    records.iter().map(|r| r.rating).collect()
}

use std::collections::BTreeMap;

use super::NumericField;
use crate::record::ProductRecord;

/// Headline numbers. Averages are `None` on an empty set.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub count: usize,
    pub avg_price: Option<f64>,
    pub avg_rating: Option<f64>,
    pub total_reviews: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; needs at least two values.
    pub stddev: Option<f64>,
}

/// One histogram bucket covering `[lo, hi)`, the last one `[lo, hi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

pub fn summary_metrics(records: &[ProductRecord]) -> SummaryMetrics {
    SummaryMetrics {
        count: records.len(),
        avg_price: mean(records.iter().map(|r| r.price)),
        avg_rating: mean(records.iter().map(|r| r.rating as f64)),
        total_reviews: records.iter().map(|r| r.review_count).sum(),
    }
}

pub fn descriptive_stats(records: &[ProductRecord], field: NumericField) -> Option<DescriptiveStats> {
    let mut values: Vec<f64> = records.iter().map(|r| field.of(r)).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };
    let stddev = (n > 1).then(|| {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    });

    Some(DescriptiveStats {
        min: values[0],
        max: values[n - 1],
        mean,
        median,
        stddev,
    })
}

/// Products per rating, ascending by rating.
pub fn rating_distribution(records: &[ProductRecord]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts.entry(r.rating).or_insert(0) += 1;
    }
    counts
}

/// Equal-width price buckets over the observed range.
pub fn price_histogram(records: &[ProductRecord], bins: usize) -> Vec<Bin> {
    let Some((lo, hi)) = super::price_bounds(records) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if hi <= lo {
        return vec![Bin {
            lo,
            hi,
            count: records.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + width * i as f64,
            hi: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for r in records {
        let idx = (((r.price - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

//! Read-only computations over a result set. No I/O, no shared state.

pub mod filter;
pub mod metrics;
pub mod rank;

pub use filter::{distinct_ratings, filter, price_bounds, FilterSpec};
pub use metrics::{
    descriptive_stats, price_histogram, rating_distribution, summary_metrics, Bin,
    DescriptiveStats, SummaryMetrics,
};
pub use rank::{best_value, sort_by, top_n_by, value_score, Order, SortKey};

use crate::record::ProductRecord;

/// Numeric columns that can be ranked or summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Price,
    Rating,
    Reviews,
}

impl NumericField {
    pub fn of(self, record: &ProductRecord) -> f64 {
        match self {
            NumericField::Price => record.price,
            NumericField::Rating => record.rating as f64,
            NumericField::Reviews => record.review_count as f64,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Placeholder used when a text field has no source element.
pub const MISSING_TEXT: &str = "N/A";

/// One product card, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub rating: i64,
    pub review_count: u64,
}

/// Records in document order. No uniqueness on `name`.
pub type ResultSet = Vec<ProductRecord>;

//! File-level records produced by generation
//!
//! These mirror what the model is asked to return and what the output and
//! checkpoint files contain. They are deliberately loose (plain strings and
//! integers); the persisted constraints are applied at ingestion.

use serde::{Deserialize, Serialize};

/// A generated company with its nested products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company name, the dedup key
    pub name: String,
    /// Short marketing line
    pub tagline: String,
    /// Long-form description
    pub description: String,
    /// Industry label
    pub industry: String,
    /// Year the company was founded
    pub founded_year: i64,
    /// Head count
    pub employee_count: i64,
    /// "City, Country"
    pub headquarters: String,
    /// Website, if the model produced one
    pub website_url: Option<String>,
    /// Exactly 3 or 4 products for generated records
    pub products: Vec<ProductRecord>,
}

/// A generated product nested inside a [`CompanyRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name, unique across the corpus
    pub name: String,
    /// Short description
    pub description: String,
    /// Intended buyer
    pub target_audience: String,
    /// Bullet-style feature list
    pub key_features: String,
    /// Pricing model label
    pub pricing_model: String,
}

impl CompanyRecord {
    /// Number of nested products
    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

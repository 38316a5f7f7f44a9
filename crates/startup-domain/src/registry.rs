//! Name registry - normalized names accepted during a generation run
//!
//! The registry is owned by whoever drives generation and is passed around
//! explicitly. It only grows within a run; [`NameRegistry::clear`] exists for
//! an explicit restart.

use std::collections::{BTreeSet, HashSet};

/// Token overlap at or above which two company names count as duplicates
pub const COMPANY_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Sets of normalized company and product names seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRegistry {
    companies: BTreeSet<String>,
    products: BTreeSet<String>,
}

/// Lowercase and trim a name
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Share of whitespace tokens two names have in common
///
/// `|a ∩ b| / max(|a|, |b|)` over lowercase token sets. Returns 0.0 when
/// either name has no tokens.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared = tokens_a.intersection(&tokens_b).count();
    shared as f64 / tokens_a.len().max(tokens_b.len()) as f64
}

impl NameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from previously saved names
    pub fn from_names<C, P>(companies: C, products: P) -> Self
    where
        C: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        let mut registry = Self::new();
        registry.merge(companies, products);
        registry
    }

    /// True if the name exactly matches a registered company, or shares at
    /// least [`COMPANY_SIMILARITY_THRESHOLD`] of its tokens with one
    pub fn is_duplicate_company(&self, name: &str) -> bool {
        let normalized = normalize(name);
        if self.companies.contains(&normalized) {
            return true;
        }

        self.companies
            .iter()
            .any(|existing| token_overlap(&normalized, existing) >= COMPANY_SIMILARITY_THRESHOLD)
    }

    /// True if the name exactly matches a registered product
    pub fn is_duplicate_product(&self, name: &str) -> bool {
        self.products.contains(&normalize(name))
    }

    /// Record an accepted company name
    pub fn register_company(&mut self, name: &str) {
        self.companies.insert(normalize(name));
    }

    /// Record an accepted product name
    pub fn register_product(&mut self, name: &str) {
        self.products.insert(normalize(name));
    }

    /// Union in names loaded from a checkpoint
    pub fn merge<C, P>(&mut self, companies: C, products: P)
    where
        C: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        self.companies
            .extend(companies.into_iter().map(|n| normalize(&n)));
        self.products
            .extend(products.into_iter().map(|n| normalize(&n)));
    }

    /// Forget every name (explicit restart only)
    pub fn clear(&mut self) {
        self.companies.clear();
        self.products.clear();
    }

    /// Number of registered company names
    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    /// Number of registered product names
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty() && self.products.is_empty()
    }

    /// Registered company names in sorted order
    pub fn company_names(&self) -> Vec<String> {
        self.companies.iter().cloned().collect()
    }

    /// Registered product names in sorted order
    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().cloned().collect()
    }

    /// Up to `limit` company names, for prompt hints
    pub fn sample_companies(&self, limit: usize) -> Vec<&str> {
        self.companies.iter().take(limit).map(String::as_str).collect()
    }

    /// Up to `limit` product names, for prompt hints
    pub fn sample_products(&self, limit: usize) -> Vec<&str> {
        self.products.iter().take(limit).map(String::as_str).collect()
    }
}

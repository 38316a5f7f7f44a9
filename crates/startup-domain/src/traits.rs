//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Company, CompanyUpdate, EntityId, NewCompany, NewProduct, Product, ProductUpdate};
use serde::{Deserialize, Serialize};

/// Largest page size a caller may request
pub const MAX_PER_PAGE: u32 = 1000;

/// Offset pagination parameters (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: u32,
    /// Rows per page, 1..=[`MAX_PER_PAGE`]
    pub per_page: u32,
}

impl PageRequest {
    /// Create a page request
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Check the bounds the HTTP boundary enforces
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be at least 1".to_string());
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
        }
        Ok(())
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Number of pages needed for `total` rows
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.per_page.max(1)))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// One page of results plus the count across all pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows matching the filters, across all pages
    pub total: u64,
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// `ceil(total / per_page)`
    pub total_pages: u64,
    /// Rows on this page
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page from its rows and the overall count
    pub fn new(request: PageRequest, total: u64, items: Vec<T>) -> Self {
        Self {
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages: request.total_pages(total),
            items,
        }
    }
}

/// Filters for listing companies
#[derive(Debug, Clone, Default)]
pub struct CompanyQuery {
    /// Exact industry label
    pub industry: Option<String>,
    /// Page to return
    pub page: PageRequest,
}

/// Filters for listing products
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Owning company
    pub company_id: Option<EntityId>,
    /// Exact pricing model label
    pub pricing_model: Option<String>,
    /// Page to return
    pub page: PageRequest,
}

/// Trait for storing and retrieving companies and products
///
/// Implemented by the infrastructure layer (startup-store)
pub trait CompanyStore {
    /// Error type for store operations
    type Error;

    /// Insert a company; the name must not already exist
    fn insert_company(&mut self, company: NewCompany) -> Result<Company, Self::Error>;

    /// Get a company by id
    fn get_company(&self, id: EntityId) -> Result<Option<Company>, Self::Error>;

    /// Get a company by exact name
    fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, Self::Error>;

    /// List companies matching the query
    fn list_companies(&self, query: &CompanyQuery) -> Result<Page<Company>, Self::Error>;

    /// Apply a partial update; `None` if the company does not exist
    fn update_company(
        &mut self,
        id: EntityId,
        update: CompanyUpdate,
    ) -> Result<Option<Company>, Self::Error>;

    /// Delete a company and its products; returns the number of products
    /// removed, or `None` if the company does not exist
    fn delete_company(&mut self, id: EntityId) -> Result<Option<usize>, Self::Error>;

    /// Insert a product owned by an existing company
    fn insert_product(
        &mut self,
        company_id: EntityId,
        product: NewProduct,
    ) -> Result<Product, Self::Error>;

    /// Get a product by id
    fn get_product(&self, id: EntityId) -> Result<Option<Product>, Self::Error>;

    /// Products owned by a company, in insertion order
    fn products_for_company(&self, company_id: EntityId) -> Result<Vec<Product>, Self::Error>;

    /// List products matching the query
    fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, Self::Error>;

    /// Apply a partial update; `None` if the product does not exist
    fn update_product(
        &mut self,
        id: EntityId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, Self::Error>;

    /// Delete a product; returns the deleted row, or `None` if absent
    fn delete_product(&mut self, id: EntityId) -> Result<Option<Product>, Self::Error>;

    /// Total number of companies
    fn count_companies(&self) -> Result<u64, Self::Error>;

    /// Total number of products
    fn count_products(&self) -> Result<u64, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (startup-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for a single-turn prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

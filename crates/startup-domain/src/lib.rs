//! Startup Data Domain Layer
//!
//! This crate contains the core model for the startup data service: the
//! persisted company and product entities, the file-level records produced by
//! generation, the industry catalog, field validation, and the name registry
//! used for deduplication during a generation run.
//!
//! ## Key Concepts
//!
//! - **Company**: A persisted startup with a generated [`EntityId`]
//! - **Product**: A persisted product owned by exactly one company
//! - **Record**: The JSON shape written by the generator and read by ingestion
//! - **Industry**: One of a fixed catalog of industries with prompt hints
//! - **Name Registry**: Normalized names seen so far in a generation run
//!
//! ## Architecture
//!
//! - Minimal dependencies (identifiers and serde only)
//! - Pure business logic only
//! - Storage and LLM implementations live in other crates behind the
//!   traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod company;
pub mod id;
pub mod industry;
pub mod pricing;
pub mod product;
pub mod record;
pub mod registry;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use company::{Company, CompanyUpdate, NewCompany};
pub use id::EntityId;
pub use industry::{Industry, IndustryProfile};
pub use pricing::PricingModel;
pub use product::{NewProduct, Product, ProductUpdate};
pub use record::{CompanyRecord, ProductRecord};
pub use registry::NameRegistry;
pub use validation::ValidationError;

/// Current unix time in whole seconds
///
/// Used for `created_at` stamps. A clock before the epoch yields 0.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

//! Bulk ingestion of generated company files
//!
//! A load runs inside one outer transaction. Each company gets its own
//! savepoint, so a company whose products fail leaves no row behind while
//! the rest of the batch proceeds. Nothing is visible until the single
//! final commit.
//!
//! Records are built through an allow-list: unknown keys are rejected and a
//! client-supplied `id` is ignored.

use crate::{company_name_exists, insert_company_row, insert_product_row, SqliteStore, StoreError};
use rusqlite::Connection;
use serde_json::{Map, Value};
use startup_domain::{unix_now, EntityId, NewCompany, NewProduct, PricingModel};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const COMPANY_FIELDS: &[&str] = &[
    "id",
    "name",
    "tagline",
    "description",
    "industry",
    "founded_year",
    "employee_count",
    "headquarters",
    "website_url",
    "products",
];

const PRODUCT_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "target_audience",
    "key_features",
    "pricing_model",
];

/// Errors reading an ingestion file; the store is never touched
#[derive(Error, Debug)]
pub enum IngestFileError {
    /// The file does not exist
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON
    #[error("Invalid JSON in data file: {0}")]
    InvalidJson(String),

    /// The file has no `companies` array, or it is empty
    #[error("No companies found in data file")]
    NoCompanies,
}

/// One company that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Company name, or "Unknown" when the record has none
    pub company: String,
    /// Why the company was rolled back
    pub error: String,
}

/// Outcome of a bulk load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Companies inserted with all their products
    pub loaded: usize,
    /// Companies whose name already existed
    pub skipped: usize,
    /// Companies rolled back
    pub errors: Vec<LoadFailure>,
}

enum Staged {
    Loaded,
    Skipped,
}

/// Read `{"companies": [...]}` from disk
pub fn read_companies_file(path: &Path) -> Result<Vec<Value>, IngestFileError> {
    if !path.exists() {
        return Err(IngestFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let document: Value =
        serde_json::from_str(&content).map_err(|e| IngestFileError::InvalidJson(e.to_string()))?;

    match document.get("companies") {
        Some(Value::Array(companies)) if !companies.is_empty() => Ok(companies.clone()),
        _ => Err(IngestFileError::NoCompanies),
    }
}

impl SqliteStore {
    /// Stage every company and commit once
    ///
    /// Per-company failures are reported in [`LoadReport::errors`]. A failed
    /// final commit rolls back the whole batch and is returned as
    /// [`StoreError::CommitFailed`].
    pub fn load_companies(&mut self, companies: &[Value]) -> Result<LoadReport, StoreError> {
        let mut report = LoadReport::default();
        let mut tx = self.conn.transaction()?;

        for record in companies {
            let name = record
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();

            match stage_company(&mut tx, record) {
                Ok(Staged::Loaded) => report.loaded += 1,
                Ok(Staged::Skipped) => report.skipped += 1,
                Err(e) => {
                    warn!(company = %name, error = %e, "Company rolled back");
                    report.errors.push(LoadFailure {
                        company: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        // A failed commit drops the transaction, which rolls everything back
        tx.commit()
            .map_err(|e| StoreError::CommitFailed(e.to_string()))?;

        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            errors = report.errors.len(),
            "Load complete"
        );
        Ok(report)
    }
}

fn stage_company(tx: &mut rusqlite::Transaction<'_>, record: &Value) -> Result<Staged, StoreError> {
    let fields = record
        .as_object()
        .ok_or_else(|| StoreError::InvalidData("company record must be an object".to_string()))?;

    let name = required_str(fields, "name")?;
    if company_name_exists(tx, &name)? {
        return Ok(Staged::Skipped);
    }

    // Dropping the savepoint without commit rolls back this company only
    let sp = tx.savepoint()?;
    let company_id = stage_rows(&sp, fields)?;
    sp.commit()?;

    tracing::debug!(%company_id, "Staged company");
    Ok(Staged::Loaded)
}

fn stage_rows(conn: &Connection, fields: &Map<String, Value>) -> Result<EntityId, StoreError> {
    let new_company = company_from_fields(fields)?;
    new_company.validate()?;

    let now = unix_now();
    let company = new_company.into_company(EntityId::new(), now);
    insert_company_row(conn, &company)?;

    let products = match fields.get("products") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            return Err(StoreError::InvalidData(
                "'products' must be an array".to_string(),
            ))
        }
    };

    for item in products {
        let product_fields = item.as_object().ok_or_else(|| {
            StoreError::InvalidData("product record must be an object".to_string())
        })?;
        let new_product = product_from_fields(product_fields)?;
        new_product.validate()?;
        let product = new_product.into_product(EntityId::new(), company.id, now);
        insert_product_row(conn, &product)?;
    }

    Ok(company.id)
}

fn reject_unknown(fields: &Map<String, Value>, allowed: &[&str], kind: &str) -> Result<(), StoreError> {
    match fields.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(StoreError::InvalidData(format!(
            "unknown {} field '{}'",
            kind, key
        ))),
        None => Ok(()),
    }
}

fn required_str(fields: &Map<String, Value>, key: &str) -> Result<String, StoreError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(StoreError::InvalidData(format!("'{}' must be a string", key))),
        None => Err(StoreError::InvalidData(format!("missing field '{}'", key))),
    }
}

fn required_int(fields: &Map<String, Value>, key: &str) -> Result<i64, StoreError> {
    match fields.get(key) {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| StoreError::InvalidData(format!("'{}' must be an integer", key))),
        None => Err(StoreError::InvalidData(format!("missing field '{}'", key))),
    }
}

fn optional_str(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, StoreError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(StoreError::InvalidData(format!("'{}' must be a string", key))),
    }
}

fn company_from_fields(fields: &Map<String, Value>) -> Result<NewCompany, StoreError> {
    reject_unknown(fields, COMPANY_FIELDS, "company")?;

    Ok(NewCompany {
        name: required_str(fields, "name")?,
        tagline: required_str(fields, "tagline")?,
        description: required_str(fields, "description")?,
        industry: required_str(fields, "industry")?,
        founded_year: required_int(fields, "founded_year")?,
        employee_count: required_int(fields, "employee_count")?,
        headquarters: required_str(fields, "headquarters")?,
        website_url: optional_str(fields, "website_url")?,
    })
}

fn product_from_fields(fields: &Map<String, Value>) -> Result<NewProduct, StoreError> {
    reject_unknown(fields, PRODUCT_FIELDS, "product")?;

    let pricing = required_str(fields, "pricing_model")?;
    let pricing_model = PricingModel::parse(&pricing).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "pricing_model '{}' must be one of {}",
            pricing,
            PricingModel::allowed()
        ))
    })?;

    Ok(NewProduct {
        name: required_str(fields, "name")?,
        description: required_str(fields, "description")?,
        target_audience: required_str(fields, "target_audience")?,
        key_features: required_str(fields, "key_features")?,
        pricing_model,
    })
}

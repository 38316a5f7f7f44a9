//! Startup Data Storage Layer
//!
//! Implements the `CompanyStore` trait on top of SQLite.
//!
//! # Architecture
//!
//! - One `companies` table with a unique name
//! - One `products` table whose rows cascade away with their company
//! - Staged, idempotent bulk ingestion in [`ingest`]
//!
//! # Examples
//!
//! ```no_run
//! use startup_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for company and product operations
//! ```

#![warn(missing_docs)]

pub mod ingest;

use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use startup_domain::traits::{CompanyQuery, CompanyStore, Page, PageRequest, ProductQuery};
use startup_domain::{
    unix_now, Company, CompanyUpdate, EntityId, NewCompany, NewProduct, PricingModel, Product,
    ProductUpdate, ValidationError,
};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub use ingest::{read_companies_file, IngestFileError, LoadFailure, LoadReport};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Referenced row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A company with this name already exists
    #[error("Company with name '{0}' already exists")]
    Duplicate(String),

    /// A field violates a persisted constraint
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The final commit of a bulk load failed; nothing was persisted
    #[error("Commit failed: {0}")]
    CommitFailed(String),
}

const COMPANY_COLUMNS: &str = "id, name, tagline, description, industry, founded_year, \
     employee_count, headquarters, website_url, created_at";

const PRODUCT_COLUMNS: &str = "id, company_id, name, description, target_audience, \
     key_features, pricing_model, created_at";

/// SQLite-based implementation of CompanyStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store across threads
/// behind a mutex, or give each thread its own instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use startup_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("startups.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Cheap round trip used by health checks
    pub fn ping(&self) -> Result<(), StoreError> {
        self.conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

fn id_from_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityId> {
    let raw: String = row.get(idx)?;
    EntityId::from_string(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into())
    })
}

fn timestamp_from_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    Ok(raw.max(0) as u64)
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: id_from_column(row, 0)?,
        name: row.get(1)?,
        tagline: row.get(2)?,
        description: row.get(3)?,
        industry: row.get(4)?,
        founded_year: row.get(5)?,
        employee_count: row.get(6)?,
        headquarters: row.get(7)?,
        website_url: row.get(8)?,
        created_at: timestamp_from_column(row, 9)?,
    })
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let pricing: String = row.get(6)?;
    let pricing_model = PricingModel::parse(&pricing).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            format!("Unknown pricing model: {}", pricing).into(),
        )
    })?;

    Ok(Product {
        id: id_from_column(row, 0)?,
        company_id: id_from_column(row, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        target_audience: row.get(4)?,
        key_features: row.get(5)?,
        pricing_model,
        created_at: timestamp_from_column(row, 7)?,
    })
}

/// Insert a company row on any connection, transaction or savepoint
pub(crate) fn insert_company_row(conn: &Connection, company: &Company) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO companies ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            COMPANY_COLUMNS
        ),
        params![
            company.id.to_string(),
            company.name,
            company.tagline,
            company.description,
            company.industry,
            company.founded_year,
            company.employee_count,
            company.headquarters,
            company.website_url,
            company.created_at as i64,
        ],
    )?;
    Ok(())
}

/// Insert a product row on any connection, transaction or savepoint
pub(crate) fn insert_product_row(conn: &Connection, product: &Product) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO products ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            PRODUCT_COLUMNS
        ),
        params![
            product.id.to_string(),
            product.company_id.to_string(),
            product.name,
            product.description,
            product.target_audience,
            product.key_features,
            product.pricing_model.as_str(),
            product.created_at as i64,
        ],
    )?;
    Ok(())
}

/// True if a company with exactly this name exists
pub(crate) fn company_name_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM companies WHERE name = ?1", params![name], |_| Ok(()))
        .optional()?
        .is_some())
}

/// Run a filtered count plus one page of rows
fn paginate<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    conditions: &[&str],
    params: Vec<Box<dyn ToSql>>,
    page: PageRequest,
    map_row: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Page<T>, StoreError> {
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}{}", table, where_clause),
        params_from_iter(params.iter()),
        |row| row.get(0),
    )?;

    let sql = format!(
        "SELECT {} FROM {}{} ORDER BY rowid LIMIT {} OFFSET {}",
        columns,
        table,
        where_clause,
        page.per_page,
        page.offset()
    );
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params_from_iter(params.iter()), map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(page, total.max(0) as u64, items))
}

impl CompanyStore for SqliteStore {
    type Error = StoreError;

    fn insert_company(&mut self, company: NewCompany) -> Result<Company, Self::Error> {
        company.validate()?;

        if company_name_exists(&self.conn, &company.name)? {
            return Err(StoreError::Duplicate(company.name));
        }

        let company = company.into_company(EntityId::new(), unix_now());
        insert_company_row(&self.conn, &company)?;
        debug!(id = %company.id, name = %company.name, "Inserted company");
        Ok(company)
    }

    fn get_company(&self, id: EntityId) -> Result<Option<Company>, Self::Error> {
        let company = self
            .conn
            .query_row(
                &format!("SELECT {} FROM companies WHERE id = ?1", COMPANY_COLUMNS),
                params![id.to_string()],
                company_from_row,
            )
            .optional()?;
        Ok(company)
    }

    fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, Self::Error> {
        let company = self
            .conn
            .query_row(
                &format!("SELECT {} FROM companies WHERE name = ?1", COMPANY_COLUMNS),
                params![name],
                company_from_row,
            )
            .optional()?;
        Ok(company)
    }

    fn list_companies(&self, query: &CompanyQuery) -> Result<Page<Company>, Self::Error> {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(industry) = &query.industry {
            conditions.push("industry = ?");
            params.push(Box::new(industry.clone()));
        }

        paginate(
            &self.conn,
            "companies",
            COMPANY_COLUMNS,
            &conditions,
            params,
            query.page,
            company_from_row,
        )
    }

    fn update_company(
        &mut self,
        id: EntityId,
        update: CompanyUpdate,
    ) -> Result<Option<Company>, Self::Error> {
        update.validate()?;

        let Some(mut company) = self.get_company(id)? else {
            return Ok(None);
        };

        if let Some(new_name) = &update.name {
            if *new_name != company.name && company_name_exists(&self.conn, new_name)? {
                return Err(StoreError::Duplicate(new_name.clone()));
            }
        }

        update.apply(&mut company);
        self.conn.execute(
            "UPDATE companies SET name = ?2, tagline = ?3, description = ?4, industry = ?5,
                founded_year = ?6, employee_count = ?7, headquarters = ?8, website_url = ?9
             WHERE id = ?1",
            params![
                company.id.to_string(),
                company.name,
                company.tagline,
                company.description,
                company.industry,
                company.founded_year,
                company.employee_count,
                company.headquarters,
                company.website_url,
            ],
        )?;
        Ok(Some(company))
    }

    fn delete_company(&mut self, id: EntityId) -> Result<Option<usize>, Self::Error> {
        let tx = self.conn.transaction()?;

        let products: i64 = tx.query_row(
            "SELECT COUNT(*) FROM products WHERE company_id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        // Products go with the company via ON DELETE CASCADE
        let deleted = tx.execute("DELETE FROM companies WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            return Ok(None);
        }

        tx.commit()?;
        debug!(%id, products, "Deleted company");
        Ok(Some(products.max(0) as usize))
    }

    fn insert_product(
        &mut self,
        company_id: EntityId,
        product: NewProduct,
    ) -> Result<Product, Self::Error> {
        product.validate()?;

        if self.get_company(company_id)?.is_none() {
            return Err(StoreError::NotFound(format!("company {}", company_id)));
        }

        let product = product.into_product(EntityId::new(), company_id, unix_now());
        insert_product_row(&self.conn, &product)?;
        debug!(id = %product.id, %company_id, "Inserted product");
        Ok(product)
    }

    fn get_product(&self, id: EntityId) -> Result<Option<Product>, Self::Error> {
        let product = self
            .conn
            .query_row(
                &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
                params![id.to_string()],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    fn products_for_company(&self, company_id: EntityId) -> Result<Vec<Product>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM products WHERE company_id = ?1 ORDER BY rowid",
            PRODUCT_COLUMNS
        ))?;
        let products = stmt
            .query_map(params![company_id.to_string()], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, Self::Error> {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(company_id) = query.company_id {
            conditions.push("company_id = ?");
            params.push(Box::new(company_id.to_string()));
        }

        if let Some(pricing_model) = &query.pricing_model {
            conditions.push("pricing_model = ?");
            params.push(Box::new(pricing_model.clone()));
        }

        paginate(
            &self.conn,
            "products",
            PRODUCT_COLUMNS,
            &conditions,
            params,
            query.page,
            product_from_row,
        )
    }

    fn update_product(
        &mut self,
        id: EntityId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, Self::Error> {
        update.validate()?;

        let Some(mut product) = self.get_product(id)? else {
            return Ok(None);
        };

        update.apply(&mut product);
        self.conn.execute(
            "UPDATE products SET name = ?2, description = ?3, target_audience = ?4,
                key_features = ?5, pricing_model = ?6
             WHERE id = ?1",
            params![
                product.id.to_string(),
                product.name,
                product.description,
                product.target_audience,
                product.key_features,
                product.pricing_model.as_str(),
            ],
        )?;
        Ok(Some(product))
    }

    fn delete_product(&mut self, id: EntityId) -> Result<Option<Product>, Self::Error> {
        let Some(product) = self.get_product(id)? else {
            return Ok(None);
        };
        self.conn
            .execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])?;
        Ok(Some(product))
    }

    fn count_companies(&self) -> Result<u64, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn count_products(&self) -> Result<u64, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

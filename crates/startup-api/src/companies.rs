//! Company routes

use crate::handlers::{
    default_page, default_per_page, parse_id, ApiError, ApiJson, ApiQuery, AppState, PageParams,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use startup_domain::traits::{CompanyQuery, CompanyStore};
use startup_domain::{Company, CompanyUpdate, NewCompany, Product};
use tracing::info;

/// Query parameters for `GET /companies`
#[derive(Debug, Deserialize)]
pub struct CompanyListParams {
    /// 1-based page
    #[serde(default = "default_page")]
    pub page: u32,
    /// Rows per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Exact industry label
    pub industry: Option<String>,
}

/// One page of companies
#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyListResponse {
    /// Matching rows across all pages
    pub total: u64,
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// Number of pages
    pub total_pages: u64,
    /// Rows on this page
    pub companies: Vec<Company>,
}

/// A company with its products
#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyDetail {
    /// Company fields
    #[serde(flatten)]
    pub company: Company,
    /// Owned products in insertion order
    pub products: Vec<Product>,
}

/// Body of `DELETE /companies/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyDeleted {
    /// Human-readable outcome
    pub message: String,
    /// Products removed with the company
    pub deleted_products: usize,
}

/// GET /companies
pub async fn list_companies(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CompanyListParams>,
) -> Result<Json<CompanyListResponse>, ApiError> {
    let page = PageParams {
        page: params.page,
        per_page: params.per_page,
    }
    .into_request()?;

    let query = CompanyQuery {
        industry: params.industry,
        page,
    };
    let result = state.store()?.list_companies(&query)?;

    Ok(Json(CompanyListResponse {
        total: result.total,
        page: result.page,
        per_page: result.per_page,
        total_pages: result.total_pages,
        companies: result.items,
    }))
}

/// GET /companies/{id}
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyDetail>, ApiError> {
    let id = parse_id(&id, "Company")?;
    let store = state.store()?;

    let company = store
        .get_company(id)?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;
    let products = store.products_for_company(id)?;

    Ok(Json(CompanyDetail { company, products }))
}

/// POST /companies
pub async fn create_company(
    State(state): State<AppState>,
    ApiJson(company): ApiJson<NewCompany>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    let company = state.store()?.insert_company(company)?;
    info!(id = %company.id, name = %company.name, "Company created");
    Ok((StatusCode::CREATED, Json(company)))
}

/// PUT /companies/{id}
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<CompanyUpdate>,
) -> Result<Json<Company>, ApiError> {
    let id = parse_id(&id, "Company")?;
    let company = state
        .store()?
        .update_company(id, update)?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;
    Ok(Json(company))
}

/// DELETE /companies/{id}
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyDeleted>, ApiError> {
    let id = parse_id(&id, "Company")?;
    let mut store = state.store()?;
    let not_found = || ApiError::NotFound("Company not found".to_string());

    let company = store.get_company(id)?.ok_or_else(not_found)?;
    let deleted_products = store.delete_company(id)?.ok_or_else(not_found)?;

    info!(%id, deleted_products, "Company deleted");
    Ok(Json(CompanyDeleted {
        message: format!("Company '{}' deleted successfully", company.name),
        deleted_products,
    }))
}

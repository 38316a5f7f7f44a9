//! Product routes

use crate::handlers::{
    default_page, default_per_page, parse_id, ApiError, ApiJson, ApiQuery, AppState,
    MessageResponse, PageParams,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use startup_domain::traits::{CompanyStore, ProductQuery};
use startup_domain::{EntityId, NewProduct, PricingModel, Product, ProductUpdate};
use startup_store::StoreError;
use tracing::info;

/// Query parameters for `GET /products`
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// 1-based page
    #[serde(default = "default_page")]
    pub page: u32,
    /// Rows per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Owning company id
    pub company_id: Option<String>,
    /// Exact pricing model label
    pub pricing_model: Option<String>,
}

/// One page of products
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    /// Matching rows across all pages
    pub total: u64,
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// Number of pages
    pub total_pages: u64,
    /// Rows on this page
    pub products: Vec<Product>,
}

/// Body of `POST /products`
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Owning company; an id that cannot parse is a missing company
    pub company_id: String,
    /// Product name
    pub name: String,
    /// Short description
    pub description: String,
    /// Intended buyer
    pub target_audience: String,
    /// Bullet-style feature list
    pub key_features: String,
    /// How the product is sold
    pub pricing_model: PricingModel,
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProductListParams>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let page = PageParams {
        page: params.page,
        per_page: params.per_page,
    }
    .into_request()?;

    // An id that cannot parse matches nothing
    let company_id = match params.company_id.as_deref() {
        Some(raw) => match EntityId::from_string(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                return Ok(Json(ProductListResponse {
                    total: 0,
                    page: page.page,
                    per_page: page.per_page,
                    total_pages: 0,
                    products: Vec::new(),
                }))
            }
        },
        None => None,
    };

    let query = ProductQuery {
        company_id,
        pricing_model: params.pricing_model,
        page,
    };
    let result = state.store()?.list_products(&query)?;

    Ok(Json(ProductListResponse {
        total: result.total,
        page: result.page,
        per_page: result.per_page,
        total_pages: result.total_pages,
        products: result.items,
    }))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id, "Product")?;
    let product = state
        .store()?
        .get_product(id)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let company_id = parse_id(&request.company_id, "Company")?;
    let product = NewProduct {
        name: request.name,
        description: request.description,
        target_audience: request.target_audience,
        key_features: request.key_features,
        pricing_model: request.pricing_model,
    };

    let product = state
        .store()?
        .insert_product(company_id, product)
        .map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::NotFound("Company not found".to_string()),
            other => other.into(),
        })?;

    info!(id = %product.id, company_id = %product.company_id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id, "Product")?;
    let product = state
        .store()?
        .update_product(id, update)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "Product")?;
    state
        .store()?
        .delete_product(id)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

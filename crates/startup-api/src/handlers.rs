//! Shared HTTP plumbing: application state, errors, health and routing.

use crate::{companies, loader, products};
use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use startup_domain::traits::{CompanyStore, PageRequest};
use startup_domain::EntityId;
use startup_store::{SqliteStore, StoreError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Store access is serialized through this mutex
    pub store: Arc<Mutex<SqliteStore>>,
    /// File ingested by `POST /load-data`
    pub data_file: PathBuf,
}

impl AppState {
    /// Wrap a store for sharing across handlers
    pub fn new(store: SqliteStore, data_file: impl Into<PathBuf>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            data_file: data_file.into(),
        }
    }

    /// Lock the store
    pub(crate) fn store(&self) -> Result<MutexGuard<'_, SqliteStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Simple acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Resource does not exist (404)
    NotFound(String),
    /// Request conflicts with existing data or is malformed (400)
    BadRequest(String),
    /// Field constraints violated (422)
    Unprocessable(String),
    /// Store unreachable (503)
    Unavailable(String),
    /// Internal server error (500)
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::Duplicate(_) => ApiError::BadRequest(e.to_string()),
            StoreError::Validation(_) => ApiError::Unprocessable(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable(rejection.body_text()),
            _ => ApiError::BadRequest(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

/// JSON body extractor whose rejections render as [`ErrorResponse`]
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string extractor whose rejections render as [`ErrorResponse`]
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `page` / `per_page` query parameters shared by list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    /// 1-based page
    #[serde(default = "default_page")]
    pub page: u32,
    /// Rows per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_per_page() -> u32 {
    10
}

impl PageParams {
    /// Check bounds and convert
    pub fn into_request(self) -> Result<PageRequest, ApiError> {
        let request = PageRequest::new(self.page, self.per_page);
        request.validate().map_err(ApiError::Unprocessable)?;
        Ok(request)
    }
}

/// Parse a path id; anything unparseable cannot exist
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<EntityId, ApiError> {
    EntityId::from_string(raw).map_err(|_| ApiError::NotFound(format!("{} not found", kind)))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when the store answers
    pub status: String,
    /// "connected" when the store answers
    pub database: String,
    /// Row counts
    pub statistics: HealthStatistics,
}

/// Row counts reported by `/health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatistics {
    /// Companies in the store
    pub total_companies: u64,
    /// Products in the store
    pub total_products: u64,
}

/// GET /health - Store connectivity and row counts
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let store = state.store()?;
    let unavailable = |e: StoreError| ApiError::Unavailable(format!("Database error: {}", e));

    store.ping().map_err(unavailable)?;
    let total_companies = store.count_companies().map_err(unavailable)?;
    let total_products = store.count_products().map_err(unavailable)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        statistics: HealthStatistics {
            total_companies,
            total_products,
        },
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/load-data", post(loader::load_data))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

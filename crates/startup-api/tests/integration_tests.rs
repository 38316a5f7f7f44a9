//! Integration tests for the API service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use startup_api::handlers::{create_router, AppState};
use startup_store::SqliteStore;
use std::path::Path;
use tower::ServiceExt; // for oneshot

fn create_app(data_file: &Path) -> Router {
    let store = SqliteStore::new(":memory:").unwrap();
    create_router(AppState::new(store, data_file))
}

fn company_body(name: &str) -> Value {
    json!({
        "name": name,
        "tagline": "Payroll without the paperwork",
        "description": "A payroll service for small teams that files taxes automatically every quarter.",
        "industry": "FinTech",
        "founded_year": 2020,
        "employee_count": 40,
        "headquarters": "Dublin, Ireland",
        "website_url": "www.example.com"
    })
}

fn product_body(company_id: &str, name: &str, pricing: &str) -> Value {
    json!({
        "company_id": company_id,
        "name": name,
        "description": "Runs payroll in minutes.",
        "target_audience": "Teams under 50 people",
        "key_features": "• Direct deposit\n• Tax filing",
        "pricing_model": pricing
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create_company(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/companies", Some(company_body(name))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_company_crud_cycle() {
    let app = create_app(Path::new("unused.json"));

    let id = create_company(&app, "PayPilot").await;

    let (status, body) = send(&app, "GET", &format!("/companies/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "PayPilot");
    assert_eq!(body["products"].as_array().unwrap().len(), 0);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/companies/{}", id),
        Some(json!({"employee_count": 55})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_count"], 55);
    assert_eq!(body["tagline"], "Payroll without the paperwork");

    let (status, body) = send(&app, "DELETE", &format!("/companies/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_products"], 0);

    let (status, body) = send(&app, "GET", &format!("/companies/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_duplicate_company_is_bad_request() {
    let app = create_app(Path::new("unused.json"));
    create_company(&app, "PayPilot").await;

    let (status, body) = send(&app, "POST", "/companies", Some(company_body("PayPilot"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("PayPilot"));
}

#[tokio::test]
async fn test_rename_onto_existing_name_is_bad_request() {
    let app = create_app(Path::new("unused.json"));
    create_company(&app, "Alpha").await;
    let beta = create_company(&app, "Beta").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/companies/{}", beta),
        Some(json!({"name": "Alpha"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_company_is_unprocessable() {
    let app = create_app(Path::new("unused.json"));
    let mut body = company_body("TooOld");
    body["founded_year"] = json!(1850);

    let (status, _) = send(&app, "POST", "/companies", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_company_pagination() {
    let app = create_app(Path::new("unused.json"));
    for i in 1..=25 {
        create_company(&app, &format!("Company {:02}", i)).await;
    }

    let (status, body) = send(&app, "GET", "/companies?page=2&per_page=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 25);
    assert_eq!(body["total_pages"], 3);
    let companies = body["companies"].as_array().unwrap();
    assert_eq!(companies.len(), 10);
    assert_eq!(companies[0]["name"], "Company 11");
    assert_eq!(companies[9]["name"], "Company 20");

    let (status, _) = send(&app, "GET", "/companies?per_page=1001", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/companies?page=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_products_and_cascade_delete() {
    let app = create_app(Path::new("unused.json"));
    let doomed = create_company(&app, "Doomed").await;
    let survivor = create_company(&app, "Survivor").await;

    for name in ["D1", "D2"] {
        let (status, _) = send(
            &app,
            "POST",
            "/products",
            Some(product_body(&doomed, name, "Subscription")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, kept) = send(
        &app,
        "POST",
        "/products",
        Some(product_body(&survivor, "S1", "Free")),
    )
    .await;

    let (_, body) = send(&app, "GET", "/products?pricing_model=Subscription", None).await;
    assert_eq!(body["total"], 2);

    let (_, body) = send(&app, "GET", &format!("/products?company_id={}", survivor), None).await;
    assert_eq!(body["total"], 1);

    let (_, body) = send(&app, "DELETE", &format!("/companies/{}", doomed), None).await;
    assert_eq!(body["deleted_products"], 2);
    assert_eq!(body["message"], "Company 'Doomed' deleted successfully");

    let (_, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(body["total"], 1);

    let kept_id = kept["id"].as_str().unwrap();
    let (status, body) = send(&app, "GET", &format!("/products/{}", kept_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "S1");
}

#[tokio::test]
async fn test_product_for_missing_company_is_not_found() {
    let app = create_app(Path::new("unused.json"));
    let missing = "0190a8c4-0000-7000-8000-000000000000";

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(product_body(missing, "Orphan", "Free")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Company not found");
}

#[tokio::test]
async fn test_product_update_and_delete() {
    let app = create_app(Path::new("unused.json"));
    let company = create_company(&app, "Owner").await;
    let (_, product) = send(
        &app,
        "POST",
        "/products",
        Some(product_body(&company, "Widget", "Free")),
    )
    .await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/products/{}", id),
        Some(json!({"pricing_model": "Enterprise"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pricing_model"], "Enterprise");

    let (status, body) = send(&app, "DELETE", &format!("/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, _) = send(&app, "DELETE", &format!("/products/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_load_data_twice() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("startup_data.json");

    let mut first = company_body("Loaded One");
    first["products"] = json!([{
        "name": "L1",
        "description": "Loads things quickly.",
        "target_audience": "Data teams",
        "key_features": "• Fast\n• Safe",
        "pricing_model": "Freemium"
    }]);
    let mut broken = company_body("Broken One");
    broken["products"] = json!([{
        "name": "B1",
        "description": "Breaks.",
        "target_audience": "Nobody",
        "key_features": "• Nothing",
        "pricing_model": "Freemium"
    }]);
    std::fs::write(
        &data_file,
        json!({"companies": [first, broken]}).to_string(),
    )
    .unwrap();

    let app = create_app(&data_file);

    let (status, body) = send(&app, "POST", "/load-data", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Data loading completed");
    assert_eq!(body["loaded"], 1);
    assert_eq!(body["skipped"], 0);
    assert_eq!(body["errors"][0]["company"], "Broken One");

    let (status, body) = send(&app, "POST", "/load-data", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["loaded"], 0);
    assert_eq!(body["skipped"], 1);

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["statistics"]["total_companies"], 1);
    assert_eq!(health["statistics"]["total_products"], 1);
}

#[tokio::test]
async fn test_load_data_clean_run_has_null_errors() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("startup_data.json");
    std::fs::write(
        &data_file,
        json!({"companies": [company_body("Solo")]}).to_string(),
    )
    .unwrap();

    let app = create_app(&data_file);
    let (status, body) = send(&app, "POST", "/load-data", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["errors"].is_null());
}

#[tokio::test]
async fn test_load_data_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let app = create_app(&dir.path().join("missing.json"));
    let (status, _) = send(&app, "POST", "/load-data", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "not json at all").unwrap();
    let app = create_app(&bad);
    let (status, _) = send(&app, "POST", "/load-data", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, r#"{"companies": []}"#).unwrap();
    let app = create_app(&empty);
    let (status, body) = send(&app, "POST", "/load-data", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written by any failed load
    assert!(body["error"].is_string());
    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["statistics"]["total_companies"], 0);
}

#[tokio::test]
async fn test_malformed_body_renders_json_error() {
    let app = create_app(Path::new("unused.json"));

    let (status, body) = send_raw(&app, "POST", "/companies", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"company_id": "x", "name": "n"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_query_renders_json_error() {
    let app = create_app(Path::new("unused.json"));

    let (status, body) = send(&app, "GET", "/companies?page=abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/products?per_page=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unparseable_company_id_on_product_create_is_not_found() {
    let app = create_app(Path::new("unused.json"));

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(product_body("not-a-uuid", "Orphan", "Free")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Company not found");
}

#[tokio::test]
async fn test_load_data_commit_failure_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("startup_data.json");
    std::fs::write(
        &data_file,
        json!({"companies": [company_body("Locked Out")]}).to_string(),
    )
    .unwrap();

    let db_path = dir.path().join("startups.db");
    let store = SqliteStore::new(&db_path).unwrap();
    let app = create_router(AppState::new(store, &data_file));

    // A reader mid-transaction blocks the final commit
    let reader = rusqlite::Connection::open(&db_path).unwrap();
    reader.execute_batch("BEGIN").unwrap();
    let _: i64 = reader
        .query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))
        .unwrap();

    let (status, body) = send(&app, "POST", "/load-data", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to commit data"));

    reader.execute_batch("COMMIT").unwrap();
    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["statistics"]["total_companies"], 0);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = create_app(Path::new("unused.json"));
    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

//! `POST /load-data`: ingest the configured data file

use crate::handlers::{ApiError, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use startup_store::{read_companies_file, IngestFileError, LoadFailure, StoreError};
use tracing::info;

/// A company that was rolled back
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadErrorEntry {
    /// Company name, or "Unknown"
    pub company: String,
    /// Why it failed
    pub error: String,
}

impl From<LoadFailure> for LoadErrorEntry {
    fn from(failure: LoadFailure) -> Self {
        Self {
            company: failure.company,
            error: failure.error,
        }
    }
}

/// Ingestion report
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadResponse {
    /// Human-readable summary
    pub message: String,
    /// Companies inserted
    pub loaded: usize,
    /// Companies already present
    pub skipped: usize,
    /// Rolled-back companies; null when there were none
    pub errors: Option<Vec<LoadErrorEntry>>,
}

impl From<IngestFileError> for ApiError {
    fn from(e: IngestFileError) -> Self {
        match e {
            IngestFileError::NotFound(_) => ApiError::NotFound(e.to_string()),
            IngestFileError::InvalidJson(_) | IngestFileError::NoCompanies => {
                ApiError::BadRequest(e.to_string())
            }
            IngestFileError::Io(_) => ApiError::Internal(e.to_string()),
        }
    }
}

/// POST /load-data
pub async fn load_data(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<LoadResponse>), ApiError> {
    let companies = read_companies_file(&state.data_file)?;

    let report = state
        .store()?
        .load_companies(&companies)
        .map_err(|e| match e {
            StoreError::CommitFailed(msg) => {
                ApiError::Internal(format!("Failed to commit data: {}", msg))
            }
            other => other.into(),
        })?;

    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        "Data loaded from {}",
        state.data_file.display()
    );

    let errors = if report.errors.is_empty() {
        None
    } else {
        Some(report.errors.into_iter().map(LoadErrorEntry::from).collect())
    };

    Ok((
        StatusCode::CREATED,
        Json(LoadResponse {
            message: "Data loading completed".to_string(),
            loaded: report.loaded,
            skipped: report.skipped,
            errors,
        }),
    ))
}

//! Durable progress checkpoint for resumable runs
//!
//! The file is rewritten in full after every orchestrator iteration. Loading
//! is forgiving: a missing, unreadable or malformed file yields an empty
//! starting point rather than an error.

use crate::error::CheckpointError;
use serde::{Deserialize, Serialize};
use startup_domain::{CompanyRecord, NameRegistry};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// On-disk checkpoint contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Companies accepted so far
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
    /// Index the next run starts from
    #[serde(default)]
    pub current_index: usize,
    /// Target count of the run that wrote the file
    #[serde(default)]
    pub total_target: usize,
    /// Normalized company names in the registry
    #[serde(default)]
    pub used_company_names: Vec<String>,
    /// Normalized product names in the registry
    #[serde(default)]
    pub used_product_names: Vec<String>,
    /// Unix time of the write, fractional seconds
    #[serde(default)]
    pub last_updated: f64,
}

/// Borrowing view used for writes
#[derive(Serialize)]
struct CheckpointView<'a> {
    companies: &'a [CompanyRecord],
    current_index: usize,
    total_target: usize,
    used_company_names: Vec<String>,
    used_product_names: Vec<String>,
    last_updated: f64,
}

/// Reads and writes the checkpoint file at a fixed path
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    total_target: usize,
}

impl CheckpointStore {
    /// Create a store for `path`, stamping `total_target` into every write
    pub fn new(path: impl Into<PathBuf>, total_target: usize) -> Self {
        Self {
            path: path.into(),
            total_target,
        }
    }

    /// Location of the checkpoint file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the checkpoint with the current state
    pub fn save(
        &self,
        companies: &[CompanyRecord],
        next_index: usize,
        registry: &NameRegistry,
    ) -> Result<(), CheckpointError> {
        let view = CheckpointView {
            companies,
            current_index: next_index,
            total_target: self.total_target,
            used_company_names: registry.company_names(),
            used_product_names: registry.product_names(),
            last_updated: now_fractional(),
        };

        let json = serde_json::to_string_pretty(&view)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), next_index, "Checkpoint saved");
        Ok(())
    }

    /// Load saved companies and the next index, merging saved names into
    /// `registry`
    ///
    /// Returns `(empty, 0)` when the file is missing or cannot be parsed.
    pub fn load(&self, registry: &mut NameRegistry) -> (Vec<CompanyRecord>, usize) {
        match self.read() {
            Ok(Some(checkpoint)) => {
                registry.merge(checkpoint.used_company_names, checkpoint.used_product_names);
                (checkpoint.companies, checkpoint.current_index)
            }
            Ok(None) => (Vec::new(), 0),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not load progress");
                (Vec::new(), 0)
            }
        }
    }

    /// Read the raw checkpoint, `None` if the file does not exist
    pub fn read(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Remove the checkpoint; a missing file is not an error
    pub fn delete(&self) -> Result<(), CheckpointError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// True if a checkpoint file is present
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

fn now_fractional() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

//! Company module - the persisted startup entity

use crate::id::EntityId;
use crate::validation::{check_length, check_range, ValidationError};
use serde::{Deserialize, Serialize};

/// Earliest accepted founding year
pub const MIN_FOUNDED_YEAR: i64 = 1900;

/// Latest accepted founding year
pub const MAX_FOUNDED_YEAR: i64 = 2025;

/// A persisted company row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Generated at insert time
    pub id: EntityId,

    /// Globally unique in the store
    pub name: String,

    /// Short marketing line
    pub tagline: String,

    /// Long-form description
    pub description: String,

    /// Industry label (the generator uses the catalog in [`crate::industry`])
    pub industry: String,

    /// Year the company was founded
    pub founded_year: i64,

    /// Head count
    pub employee_count: i64,

    /// "City, Country"
    pub headquarters: String,

    /// Optional website
    pub website_url: Option<String>,

    /// Unix timestamp of insertion
    pub created_at: u64,
}

/// Validated input for creating a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    /// Company name
    pub name: String,
    /// Short marketing line
    pub tagline: String,
    /// Long-form description
    pub description: String,
    /// Industry label
    pub industry: String,
    /// Year the company was founded
    pub founded_year: i64,
    /// Head count
    pub employee_count: i64,
    /// "City, Country"
    pub headquarters: String,
    /// Optional website
    #[serde(default)]
    pub website_url: Option<String>,
}

impl NewCompany {
    /// Check every field against the persisted constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_tagline(&self.tagline)?;
        validate_description(&self.description)?;
        validate_industry(&self.industry)?;
        validate_founded_year(self.founded_year)?;
        validate_employee_count(self.employee_count)?;
        validate_headquarters(&self.headquarters)?;
        if let Some(url) = &self.website_url {
            validate_website_url(url)?;
        }
        Ok(())
    }

    /// Turn the input into a row with a fresh id
    pub fn into_company(self, id: EntityId, created_at: u64) -> Company {
        Company {
            id,
            name: self.name,
            tagline: self.tagline,
            description: self.description,
            industry: self.industry,
            founded_year: self.founded_year,
            employee_count: self.employee_count,
            headquarters: self.headquarters,
            website_url: self.website_url,
            created_at,
        }
    }
}

/// Partial update of a company; only `Some` fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New tagline
    #[serde(default)]
    pub tagline: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New industry
    #[serde(default)]
    pub industry: Option<String>,
    /// New founding year
    #[serde(default)]
    pub founded_year: Option<i64>,
    /// New head count
    #[serde(default)]
    pub employee_count: Option<i64>,
    /// New headquarters
    #[serde(default)]
    pub headquarters: Option<String>,
    /// New website
    #[serde(default)]
    pub website_url: Option<String>,
}

impl CompanyUpdate {
    /// Validate the fields that are present
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(v) = &self.name {
            validate_name(v)?;
        }
        if let Some(v) = &self.tagline {
            validate_tagline(v)?;
        }
        if let Some(v) = &self.description {
            validate_description(v)?;
        }
        if let Some(v) = &self.industry {
            validate_industry(v)?;
        }
        if let Some(v) = self.founded_year {
            validate_founded_year(v)?;
        }
        if let Some(v) = self.employee_count {
            validate_employee_count(v)?;
        }
        if let Some(v) = &self.headquarters {
            validate_headquarters(v)?;
        }
        if let Some(v) = &self.website_url {
            validate_website_url(v)?;
        }
        Ok(())
    }

    /// Apply the present fields to a company
    pub fn apply(self, company: &mut Company) {
        if let Some(v) = self.name {
            company.name = v;
        }
        if let Some(v) = self.tagline {
            company.tagline = v;
        }
        if let Some(v) = self.description {
            company.description = v;
        }
        if let Some(v) = self.industry {
            company.industry = v;
        }
        if let Some(v) = self.founded_year {
            company.founded_year = v;
        }
        if let Some(v) = self.employee_count {
            company.employee_count = v;
        }
        if let Some(v) = self.headquarters {
            company.headquarters = v;
        }
        if let Some(v) = self.website_url {
            company.website_url = Some(v);
        }
    }
}

fn validate_name(v: &str) -> Result<(), ValidationError> {
    check_length("name", v, 1, Some(255))
}

fn validate_tagline(v: &str) -> Result<(), ValidationError> {
    check_length("tagline", v, 5, Some(100))
}

fn validate_description(v: &str) -> Result<(), ValidationError> {
    check_length("description", v, 50, None)
}

fn validate_industry(v: &str) -> Result<(), ValidationError> {
    check_length("industry", v, 3, None)
}

fn validate_founded_year(v: i64) -> Result<(), ValidationError> {
    check_range("founded_year", v, MIN_FOUNDED_YEAR, MAX_FOUNDED_YEAR)
}

fn validate_employee_count(v: i64) -> Result<(), ValidationError> {
    if v <= 0 {
        return Err(ValidationError::new("employee_count", "must be greater than 0"));
    }
    Ok(())
}

fn validate_headquarters(v: &str) -> Result<(), ValidationError> {
    check_length("headquarters", v, 5, None)
}

fn validate_website_url(v: &str) -> Result<(), ValidationError> {
    check_length("website_url", v, 0, Some(255))
}

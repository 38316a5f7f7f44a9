//! Product module - products owned by a company

use crate::id::EntityId;
use crate::pricing::PricingModel;
use crate::validation::{check_length, ValidationError};
use serde::{Deserialize, Serialize};

/// A persisted product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Generated at insert time
    pub id: EntityId,

    /// Owning company; the product is deleted with it
    pub company_id: EntityId,

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

    /// Unix timestamp of insertion
    pub created_at: u64,
}

/// Validated input for creating a product
///
/// The owning company is supplied separately so the same type serves both
/// HTTP creation and nested ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
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

impl NewProduct {
    /// Check every field against the persisted constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_target_audience(&self.target_audience)?;
        validate_key_features(&self.key_features)?;
        Ok(())
    }

    /// Turn the input into a row with a fresh id
    pub fn into_product(self, id: EntityId, company_id: EntityId, created_at: u64) -> Product {
        Product {
            id,
            company_id,
            name: self.name,
            description: self.description,
            target_audience: self.target_audience,
            key_features: self.key_features,
            pricing_model: self.pricing_model,
            created_at,
        }
    }
}

/// Partial update of a product; only `Some` fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New audience
    #[serde(default)]
    pub target_audience: Option<String>,
    /// New feature list
    #[serde(default)]
    pub key_features: Option<String>,
    /// New pricing model
    #[serde(default)]
    pub pricing_model: Option<PricingModel>,
}

impl ProductUpdate {
    /// Validate the fields that are present
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(v) = &self.name {
            validate_name(v)?;
        }
        if let Some(v) = &self.description {
            validate_description(v)?;
        }
        if let Some(v) = &self.target_audience {
            validate_target_audience(v)?;
        }
        if let Some(v) = &self.key_features {
            validate_key_features(v)?;
        }
        Ok(())
    }

    /// Apply the present fields to a product
    pub fn apply(self, product: &mut Product) {
        if let Some(v) = self.name {
            product.name = v;
        }
        if let Some(v) = self.description {
            product.description = v;
        }
        if let Some(v) = self.target_audience {
            product.target_audience = v;
        }
        if let Some(v) = self.key_features {
            product.key_features = v;
        }
        if let Some(v) = self.pricing_model {
            product.pricing_model = v;
        }
    }
}

fn validate_name(v: &str) -> Result<(), ValidationError> {
    check_length("name", v, 1, Some(255))
}

fn validate_description(v: &str) -> Result<(), ValidationError> {
    check_length("description", v, 10, None)
}

fn validate_target_audience(v: &str) -> Result<(), ValidationError> {
    check_length("target_audience", v, 5, None)
}

fn validate_key_features(v: &str) -> Result<(), ValidationError> {
    check_length("key_features", v, 10, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewProduct {
        NewProduct {
            name: "LoopSync".to_string(),
            description: "Syncs bank feeds into the ledger every night.".to_string(),
            target_audience: "Clinics with 5-50 staff".to_string(),
            key_features: "• Bank feeds\n• Auto-matching".to_string(),
            pricing_model: PricingModel::Subscription,
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut product = sample();
        product.name = String::new();
        assert_eq!(product.validate().unwrap_err().field, "name");
    }

    #[test]
    fn test_unknown_pricing_model_fails_to_deserialize() {
        let json = r#"{
            "name": "LoopSync",
            "description": "Syncs bank feeds nightly.",
            "target_audience": "Small clinics",
            "key_features": "• Bank feeds",
            "pricing_model": "Lifetime"
        }"#;
        assert!(serde_json::from_str::<NewProduct>(json).is_err());
    }

    #[test]
    fn test_update_pricing_model() {
        let mut product = sample().into_product(EntityId::new(), EntityId::new(), 0);
        ProductUpdate {
            pricing_model: Some(PricingModel::Enterprise),
            ..Default::default()
        }
        .apply(&mut product);
        assert_eq!(product.pricing_model, PricingModel::Enterprise);
        assert_eq!(product.name, "LoopSync");
    }
}

//! Pricing module - how a product is sold

use serde::{Deserialize, Serialize};

/// Pricing model of a product
///
/// The stored and wire form is the capitalized name (`"Freemium"`), matching
/// what the generator asks the model to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingModel {
    /// No charge
    Free,

    /// Free tier with paid upgrades
    Freemium,

    /// Recurring paid plan
    Subscription,

    /// Negotiated contract
    Enterprise,
}

impl PricingModel {
    /// All pricing models in display order
    pub const ALL: [PricingModel; 4] = [
        PricingModel::Free,
        PricingModel::Freemium,
        PricingModel::Subscription,
        PricingModel::Enterprise,
    ];

    /// Get the pricing model name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::Free => "Free",
            PricingModel::Freemium => "Freemium",
            PricingModel::Subscription => "Subscription",
            PricingModel::Enterprise => "Enterprise",
        }
    }

    /// Parse a pricing model from its exact name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Free" => Some(PricingModel::Free),
            "Freemium" => Some(PricingModel::Freemium),
            "Subscription" => Some(PricingModel::Subscription),
            "Enterprise" => Some(PricingModel::Enterprise),
            _ => None,
        }
    }

    /// Comma-separated list of accepted names, for error messages
    pub fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for PricingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PricingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("pricing_model must be one of: {}", Self::allowed())
        })
    }
}

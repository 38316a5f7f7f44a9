//! Industry catalog used to steer generation

use serde::{Deserialize, Serialize};

/// One of the fixed industries companies are generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    /// Payments, banking, investment
    FinTech,
    /// Telemedicine, monitoring, medical software
    HealthTech,
    /// Online learning and training
    EdTech,
    /// Online retail and marketplaces
    #[serde(rename = "E-commerce")]
    ECommerce,
    /// Business software as a service
    SaaS,
}

/// Prompt hints for an industry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndustryProfile {
    /// What companies in this industry work on
    pub focus: &'static str,
    /// Example product categories
    pub products: &'static [&'static str],
}

impl Industry {
    /// The full catalog, each entry equally likely to be picked
    pub const ALL: [Industry; 5] = [
        Industry::FinTech,
        Industry::HealthTech,
        Industry::EdTech,
        Industry::ECommerce,
        Industry::SaaS,
    ];

    /// Display and storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::FinTech => "FinTech",
            Industry::HealthTech => "HealthTech",
            Industry::EdTech => "EdTech",
            Industry::ECommerce => "E-commerce",
            Industry::SaaS => "SaaS",
        }
    }

    /// Parse a catalog label
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == s)
    }

    /// Prompt hints for this industry
    pub fn profile(&self) -> IndustryProfile {
        match self {
            Industry::FinTech => IndustryProfile {
                focus: "financial technology, payments, banking, investment",
                products: &[
                    "payment platforms",
                    "investment tools",
                    "financial analytics",
                    "crypto solutions",
                ],
            },
            Industry::HealthTech => IndustryProfile {
                focus: "healthcare technology, telemedicine, health monitoring, medical software",
                products: &[
                    "telemedicine platforms",
                    "health trackers",
                    "medical records systems",
                    "AI diagnostics",
                ],
            },
            Industry::EdTech => IndustryProfile {
                focus: "educational technology, online learning, student management, skills training",
                products: &[
                    "learning platforms",
                    "course management",
                    "assessment tools",
                    "skills training",
                ],
            },
            Industry::ECommerce => IndustryProfile {
                focus: "online retail, marketplace, shopping platforms, delivery services",
                products: &[
                    "marketplace platforms",
                    "inventory management",
                    "logistics solutions",
                    "customer analytics",
                ],
            },
            Industry::SaaS => IndustryProfile {
                focus: "software as a service, business tools, productivity, automation",
                products: &[
                    "project management",
                    "CRM systems",
                    "automation tools",
                    "collaboration platforms",
                ],
            },
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

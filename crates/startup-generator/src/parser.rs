//! Parse LLM output into company records

use crate::error::AttemptError;
use serde_json::Value;
use startup_domain::{CompanyRecord, ProductRecord};

/// Top-level fields every generated company must carry
pub const REQUIRED_FIELDS: [&str; 9] = [
    "name",
    "tagline",
    "description",
    "industry",
    "founded_year",
    "employee_count",
    "headquarters",
    "website_url",
    "products",
];

/// Parse an LLM reply into a record with exactly `expected_products` products
pub fn parse_company(response: &str, expected_products: usize) -> Result<CompanyRecord, AttemptError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| AttemptError::Parse(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| AttemptError::Parse("Expected JSON object".to_string()))?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !obj.contains_key(**field)) {
        return Err(AttemptError::Validation(format!("Missing field: {}", missing)));
    }

    let products = obj["products"]
        .as_array()
        .ok_or_else(|| AttemptError::Validation("'products' is not an array".to_string()))?;

    if products.len() != expected_products {
        return Err(AttemptError::ProductCount {
            expected: expected_products,
            actual: products.len(),
        });
    }

    for (idx, product) in products.iter().enumerate() {
        serde_json::from_value::<ProductRecord>(product.clone())
            .map_err(|e| AttemptError::Validation(format!("Product {} malformed: {}", idx, e)))?;
    }

    serde_json::from_value(json)
        .map_err(|e| AttemptError::Validation(format!("Company malformed: {}", e)))
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, AttemptError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(AttemptError::Parse("Empty code block".to_string()));
        }

        // Skip the opening fence (with optional language tag) and the closing fence
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

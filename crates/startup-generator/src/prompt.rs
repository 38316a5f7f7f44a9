//! LLM prompt engineering for company generation

use startup_domain::Industry;

/// Builds the prompt for one generated company
pub struct PromptBuilder<'a> {
    industry: Industry,
    product_count: usize,
    used_companies: Vec<&'a str>,
    used_products: Vec<&'a str>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(industry: Industry, product_count: usize) -> Self {
        Self {
            industry,
            product_count,
            used_companies: Vec::new(),
            used_products: Vec::new(),
        }
    }

    /// Company names the model should avoid
    pub fn with_used_companies(mut self, names: Vec<&'a str>) -> Self {
        self.used_companies = names;
        self
    }

    /// Product names the model should avoid
    pub fn with_used_products(mut self, names: Vec<&'a str>) -> Self {
        self.used_products = names;
        self
    }

    /// Build the complete generation prompt
    pub fn build(&self) -> String {
        let profile = self.industry.profile();
        let label = self.industry.as_str();
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "Generate realistic data for a {} startup company.\n\n",
            label
        ));

        // 1. Industry context
        prompt.push_str(&format!("INDUSTRY: {}\n", profile.focus));
        prompt.push_str(&format!("TYPICAL PRODUCTS: {}\n\n", profile.products.join(", ")));

        // 2. Deduplication hints
        prompt.push_str("AVOID DUPLICATES:\n");
        prompt.push_str(&format!("- Company names: {}\n", hint_list(&self.used_companies)));
        prompt.push_str(&format!("- Product names: {}\n\n", hint_list(&self.used_products)));

        // 3. Exact product count
        prompt.push_str(&format!(
            "Generate EXACTLY {} products.\n\n",
            self.product_count
        ));

        // 4. Realism constraints
        prompt.push_str(REALISM_CONSTRAINTS);
        prompt.push_str("\n\n");

        // 5. Output shape
        prompt.push_str(&OUTPUT_FORMAT.replace("{industry}", label));

        prompt
    }
}

fn hint_list(names: &[&str]) -> String {
    if names.is_empty() {
        "none yet".to_string()
    } else {
        names.join(", ")
    }
}

const REALISM_CONSTRAINTS: &str = r#"REALISTIC CONSTRAINTS:
- Founded: 2018-2025
- Employees: 5-120
- Customers: 10-2,000
- Revenue: $500k-$20M
- Growth: 10%-80%
- Target: SMBs, mid-market, clinics, small e-commerce

NO extreme claims or sci-fi features."#;

const OUTPUT_FORMAT: &str = r#"Return ONLY this JSON structure:

{
  "name": "[Unique startup name]",
  "tagline": "[Simple tagline <100 chars]",
  "description": "[2-3 paragraphs, 120-180 words, realistic]",
  "industry": "{industry}",
  "founded_year": [2018-2024],
  "employee_count": [5-120],
  "headquarters": "[City, Country]",
  "website_url": "www.[companyname].com",
  "products": [
    {
      "name": "[Unique product name]",
      "description": "[2-3 sentences, no hype]",
      "target_audience": "[Realistic buyer: 'SMBs with 20-150 employees']",
      "key_features": "• Feature 1\n• Feature 2\n• Feature 3\n• Feature 4\n• Feature 5",
      "pricing_model": "[Freemium/Subscription/Enterprise]"
    }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_industry_profile() {
        let prompt = PromptBuilder::new(Industry::HealthTech, 3).build();
        assert!(prompt.contains("HealthTech startup"));
        assert!(prompt.contains(Industry::HealthTech.profile().focus));
        assert!(prompt.contains("telemedicine platforms"));
        assert!(prompt.contains(r#""industry": "HealthTech""#));
    }

    #[test]
    fn test_prompt_states_exact_product_count() {
        let prompt = PromptBuilder::new(Industry::SaaS, 4).build();
        assert!(prompt.contains("Generate EXACTLY 4 products."));
    }

    #[test]
    fn test_prompt_without_hints_says_none_yet() {
        let prompt = PromptBuilder::new(Industry::FinTech, 3).build();
        assert!(prompt.contains("- Company names: none yet"));
        assert!(prompt.contains("- Product names: none yet"));
    }

    #[test]
    fn test_prompt_includes_hints() {
        let prompt = PromptBuilder::new(Industry::EdTech, 3)
            .with_used_companies(vec!["lessonloop", "quizhive"])
            .with_used_products(vec!["loopclass"])
            .build();
        assert!(prompt.contains("- Company names: lessonloop, quizhive"));
        assert!(prompt.contains("- Product names: loopclass"));
    }

    #[test]
    fn test_prompt_includes_constraints_and_shape() {
        let prompt = PromptBuilder::new(Industry::ECommerce, 3).build();
        assert!(prompt.contains("Employees: 5-120"));
        assert!(prompt.contains("NO extreme claims"));
        assert!(prompt.contains(r#""industry": "E-commerce""#));
        assert!(prompt.contains("\"pricing_model\""));
    }
}

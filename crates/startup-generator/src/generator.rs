//! Single-company generation with validation and retry

use crate::config::GeneratorConfig;
use crate::error::{AttemptError, GenerationError};
use crate::parser::parse_company;
use crate::prompt::PromptBuilder;
use rand::seq::SliceRandom;
use rand::Rng;
use startup_domain::traits::LlmProvider;
use startup_domain::{CompanyRecord, Industry, NameRegistry};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Products per company are drawn uniformly from this range
pub const PRODUCT_COUNT_CHOICES: [usize; 2] = [3, 4];

/// Generates one validated, non-duplicate company at a time
pub struct RecordGenerator<L, R> {
    llm: L,
    rng: R,
    config: GeneratorConfig,
}

impl<L, R> RecordGenerator<L, R>
where
    L: LlmProvider,
    L::Error: Display,
    R: Rng,
{
    /// Create a new generator
    pub fn new(llm: L, rng: R, config: GeneratorConfig) -> Self {
        Self { llm, rng, config }
    }

    /// The provider used for generation
    pub fn provider(&self) -> &L {
        &self.llm
    }

    /// Pick an industry uniformly from the catalog
    pub fn pick_industry(&mut self) -> Industry {
        *Industry::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Industry::SaaS)
    }

    /// Generate a company in `industry`, registering its names on success
    ///
    /// The product count is fixed before the first attempt and every retry
    /// reuses the same prompt.
    pub fn generate(
        &mut self,
        industry: Industry,
        registry: &mut NameRegistry,
    ) -> Result<CompanyRecord, GenerationError> {
        let product_count = *PRODUCT_COUNT_CHOICES
            .choose(&mut self.rng)
            .unwrap_or(&PRODUCT_COUNT_CHOICES[0]);

        let prompt = PromptBuilder::new(industry, product_count)
            .with_used_companies(registry.sample_companies(self.config.company_hint_limit))
            .with_used_products(registry.sample_products(self.config.product_hint_limit))
            .build();

        debug!("Prompt length: {} chars", prompt.len());

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt(&prompt, product_count, registry) {
                Ok(record) => {
                    registry.register_company(&record.name);
                    for product in &record.products {
                        registry.register_product(&product.name);
                    }
                    info!(
                        company = %record.name,
                        products = record.product_count(),
                        attempt,
                        "Generated company"
                    );
                    return Ok(record);
                }
                Err(e) if attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %e, "Generation attempt failed, retrying");
                    std::thread::sleep(self.config.retry_delay());
                    attempt += 1;
                }
                Err(e) => {
                    return Err(GenerationError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
            }
        }
    }

    /// One call plus validation; leaves the registry untouched
    fn attempt(
        &self,
        prompt: &str,
        product_count: usize,
        registry: &NameRegistry,
    ) -> Result<CompanyRecord, AttemptError> {
        let response = self
            .llm
            .generate(prompt)
            .map_err(|e| AttemptError::Llm(e.to_string()))?;

        let record = parse_company(&response, product_count)?;

        if registry.is_duplicate_company(&record.name) {
            return Err(AttemptError::DuplicateCompany(record.name));
        }

        if let Some(product) = record
            .products
            .iter()
            .find(|p| registry.is_duplicate_product(&p.name))
        {
            return Err(AttemptError::DuplicateProduct(product.name.clone()));
        }

        Ok(record)
    }
}

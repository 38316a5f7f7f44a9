//! Batch orchestration: resume, generate, checkpoint, finish

use crate::checkpoint::CheckpointStore;
use crate::config::GeneratorConfig;
use crate::error::{GenerationError, OrchestratorError};
use crate::generator::RecordGenerator;
use rand::Rng;
use serde::Serialize;
use startup_domain::traits::LlmProvider;
use startup_domain::{CompanyRecord, Industry, NameRegistry};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Decides whether to continue from an existing checkpoint
pub trait ResumePrompt {
    /// `existing` companies were found; return true to continue from
    /// `next_index`, false to discard them and start over
    fn confirm_resume(&mut self, existing: usize, next_index: usize) -> bool;
}

/// A [`ResumePrompt`] that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ResumePrompt for FixedAnswer {
    fn confirm_resume(&mut self, _existing: usize, _next_index: usize) -> bool {
        self.0
    }
}

/// Progress notifications emitted during a run
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// Continuing from a checkpoint
    Resumed {
        /// Companies carried over
        companies: usize,
        /// First slot to generate
        next_index: usize,
    },
    /// Previous output and checkpoint were discarded
    Restarted,
    /// About to generate slot `position` (1-based) of `total`
    Generating {
        /// 1-based slot number
        position: usize,
        /// Target count
        total: usize,
        /// Industry picked for this slot
        industry: Industry,
    },
    /// A company was accepted
    Generated(&'a CompanyRecord),
    /// A slot failed every attempt
    Failed {
        /// 1-based slot number
        position: usize,
        /// Final failure
        error: &'a GenerationError,
    },
}

/// Receives [`RunEvent`]s; the unit type ignores them
pub trait RunObserver {
    /// Handle one event
    fn on_event(&mut self, _event: &RunEvent<'_>) {}
}

impl RunObserver for () {}

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Companies in the output file
    pub companies: usize,
    /// Products across those companies
    pub products: usize,
    /// Slots that failed during this run
    pub failures: usize,
    /// True when the target count was reached and the checkpoint removed
    pub completed: bool,
    /// Where the output was written
    pub output_file: PathBuf,
}

#[derive(Serialize)]
struct OutputFile<'a> {
    companies: &'a [CompanyRecord],
}

/// Drives a resumable batch of generations
pub struct Orchestrator<L, R> {
    generator: RecordGenerator<L, R>,
    checkpoint: CheckpointStore,
    registry: NameRegistry,
    config: GeneratorConfig,
    cancel: Arc<AtomicBool>,
}

impl<L, R> Orchestrator<L, R>
where
    L: LlmProvider,
    L::Error: Display,
    R: Rng,
{
    /// Create an orchestrator with an empty registry
    pub fn new(llm: L, rng: R, config: GeneratorConfig) -> Self {
        let checkpoint = CheckpointStore::new(&config.progress_file, config.total_companies);
        Self {
            generator: RecordGenerator::new(llm, rng, config.clone()),
            checkpoint,
            registry: NameRegistry::new(),
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use an externally owned cancellation flag (set from a signal handler)
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    /// Flag that stops the run at the next iteration boundary
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Names accepted so far
    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// The underlying generator
    pub fn generator(&self) -> &RecordGenerator<L, R> {
        &self.generator
    }

    /// Run to the target count, resuming if a checkpoint allows it
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Interrupted`] when the cancellation flag
    /// is observed; the checkpoint on disk is then valid for resume. Failed
    /// slots are not errors; they are counted in [`RunSummary::failures`].
    pub fn run(
        &mut self,
        prompt: &mut dyn ResumePrompt,
        observer: &mut dyn RunObserver,
    ) -> Result<RunSummary, OrchestratorError> {
        self.config.validate().map_err(OrchestratorError::Config)?;

        let total = self.config.total_companies;
        let (mut companies, mut start) = if self.config.resume {
            self.checkpoint.load(&mut self.registry)
        } else {
            (Vec::new(), 0)
        };

        if !companies.is_empty() {
            info!(companies = companies.len(), next_index = start, "Found previous run");
            if prompt.confirm_resume(companies.len(), start) {
                observer.on_event(&RunEvent::Resumed {
                    companies: companies.len(),
                    next_index: start,
                });
            } else {
                remove_if_exists(&self.config.output_file)?;
                self.checkpoint.delete()?;
                companies.clear();
                start = 0;
                self.registry.clear();
                observer.on_event(&RunEvent::Restarted);
            }
        }

        info!(start, total, "Starting generation");
        let mut failures = 0;

        for i in start..total {
            if self.cancel.load(Ordering::SeqCst) {
                info!(next_index = i, "Generation interrupted");
                return Err(OrchestratorError::Interrupted {
                    completed: companies.len(),
                    next_index: i,
                });
            }

            let industry = self.generator.pick_industry();
            observer.on_event(&RunEvent::Generating {
                position: i + 1,
                total,
                industry,
            });

            match self.generator.generate(industry, &mut self.registry) {
                Ok(record) => {
                    observer.on_event(&RunEvent::Generated(&record));
                    companies.push(record);
                    self.checkpoint.save(&companies, i + 1, &self.registry)?;
                    std::thread::sleep(self.config.pacing_delay());
                }
                Err(e) => {
                    error!(slot = i, error = %e, "Slot failed");
                    observer.on_event(&RunEvent::Failed {
                        position: i + 1,
                        error: &e,
                    });
                    failures += 1;
                    // The slot stays pending for a future resume
                    self.checkpoint.save(&companies, i, &self.registry)?;
                }
            }
        }

        let json = serde_json::to_string_pretty(&OutputFile {
            companies: &companies,
        })?;
        std::fs::write(&self.config.output_file, json)?;

        let completed = companies.len() == total;
        if completed {
            self.checkpoint.delete()?;
        }

        let products = companies.iter().map(CompanyRecord::product_count).sum();
        info!(
            companies = companies.len(),
            products, failures, completed, "Generation finished"
        );

        Ok(RunSummary {
            companies: companies.len(),
            products,
            failures,
            completed,
            output_file: self.config.output_file.clone(),
        })
    }
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

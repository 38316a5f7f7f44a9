//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::config::resolve_generator_config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use startup_generator::{
    FixedAnswer, Orchestrator, OrchestratorError, ResumePrompt, RunEvent, RunObserver,
};
use startup_llm::AnthropicProvider;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Execute the generate command.
pub fn execute_generate(args: GenerateArgs, formatter: &Formatter) -> Result<()> {
    let config = resolve_generator_config(&args)?;

    dotenvy::dotenv().ok();
    let api_key = std::env::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingApiKey)?;

    let provider = AnthropicProvider::new(api_key, &config.model)?
        .with_max_tokens(config.max_tokens)
        .with_temperature(config.temperature);

    let cancel = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&cancel));

    let progress_file = config.progress_file.clone();
    let mut orchestrator =
        Orchestrator::new(provider, rand::thread_rng(), config).with_cancel_flag(cancel);

    let mut prompt: Box<dyn ResumePrompt> = if args.yes {
        Box::new(FixedAnswer(true))
    } else if args.restart {
        Box::new(FixedAnswer(false))
    } else {
        Box::new(StdinPrompt::new(io::stdin().lock(), io::stdout()))
    };
    let mut printer = ProgressPrinter { formatter };

    match orchestrator.run(prompt.as_mut(), &mut printer) {
        Ok(summary) => {
            println!();
            println!("{}", formatter.run_summary(&summary));
            Ok(())
        }
        Err(OrchestratorError::Interrupted { completed, .. }) => Err(CliError::Interrupted {
            completed,
            progress_file,
        }),
        Err(e) => Err(e.into()),
    }
}

/// First Ctrl-C stops the run at the next slot; a second one exits at once.
fn install_interrupt_handler(flag: Arc<AtomicBool>) {
    let result = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            eprintln!("\nForce exiting.");
            std::process::exit(130);
        }
        eprintln!("\nInterrupt received. Finishing the current company; press Ctrl-C again to exit now.");
    });

    if let Err(e) = result {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }
}

/// Asks on a terminal whether to continue from a checkpoint.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    /// Prompt on `output`, read the answer from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ResumePrompt for StdinPrompt<R, W> {
    fn confirm_resume(&mut self, existing: usize, next_index: usize) -> bool {
        let written = write!(
            self.output,
            "Found {} existing companies (next index {}). Continue? (y/n): ",
            existing, next_index
        )
        .and_then(|()| self.output.flush());
        if let Err(e) = written {
            warn!("Could not write resume prompt: {}", e);
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!("Could not read answer: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prints one line per run event to stdout.
struct ProgressPrinter<'a> {
    formatter: &'a Formatter,
}

impl RunObserver for ProgressPrinter<'_> {
    fn on_event(&mut self, event: &RunEvent<'_>) {
        println!("{}", self.formatter.run_event(event));
    }
}

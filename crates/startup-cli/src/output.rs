//! Output formatting for the CLI.

use colored::*;
use startup_generator::{RunEvent, RunSummary};
use startup_store::LoadReport;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format one progress event of a generation run.
    pub fn run_event(&self, event: &RunEvent<'_>) -> String {
        match event {
            RunEvent::Resumed {
                companies,
                next_index,
            } => self.info(&format!(
                "Resuming with {} companies, starting at index {}",
                companies, next_index
            )),
            RunEvent::Restarted => self.info("Starting fresh"),
            RunEvent::Generating {
                position,
                total,
                industry,
            } => format!("[{}/{}] Generating {} company...", position, total, industry),
            RunEvent::Generated(company) => self.success(&format!(
                "{} ({} products)",
                company.name,
                company.products.len()
            )),
            RunEvent::Failed { error, .. } => self.error(&format!("Failed: {}", error)),
        }
    }

    /// Format the end-of-run summary.
    pub fn run_summary(&self, summary: &RunSummary) -> String {
        let mut lines = vec![self.success(&format!(
            "Generated {} companies with {} products",
            summary.companies, summary.products
        ))];
        lines.push(self.info(&format!("Saved to {}", summary.output_file.display())));
        if !summary.completed {
            lines.push(self.warning(&format!(
                "Target not reached ({} failed this run); run again to continue",
                summary.failures
            )));
        }
        lines.join("\n")
    }

    /// Format an ingestion report.
    pub fn load_report(&self, report: &LoadReport) -> String {
        let mut lines = vec![self.success(&format!(
            "Loaded {} companies, skipped {} already present",
            report.loaded, report.skipped
        ))];
        for failure in &report.errors {
            lines.push(self.error(&format!("{}: {}", failure.company, failure.error)));
        }
        lines.join("\n")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

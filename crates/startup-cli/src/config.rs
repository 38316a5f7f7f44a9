//! Generator configuration resolution for the CLI.
//!
//! A TOML file (if given) replaces the built-in defaults, then command-line
//! flags override individual values.

use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use startup_generator::GeneratorConfig;
use std::fs;

/// Build the effective generator configuration for a `generate` run.
pub fn resolve_generator_config(args: &GenerateArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path).map_err(|e| {
                CliError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            GeneratorConfig::from_toml(&contents).map_err(CliError::Config)?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(count) = args.count {
        config.total_companies = count;
    }
    if let Some(output) = &args.output {
        config.output_file = output.clone();
    }
    if let Some(progress) = &args.progress {
        config.progress_file = progress.clone();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if args.no_resume {
        config.resume = false;
    }

    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> GenerateArgs {
        GenerateArgs {
            config: None,
            count: None,
            output: None,
            progress: None,
            model: None,
            no_resume: false,
            yes: false,
            restart: false,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_generator_config(&args()).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generator.toml");
        fs::write(
            &path,
            "total_companies = 50\nmax_attempts = 2\noutput_file = \"from_file.json\"\n",
        )
        .unwrap();

        let mut args = args();
        args.config = Some(path);
        args.output = Some(PathBuf::from("from_flag.json"));
        args.no_resume = true;

        let config = resolve_generator_config(&args).unwrap();
        assert_eq!(config.total_companies, 50);
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.output_file, PathBuf::from("from_flag.json"));
        assert!(!config.resume);
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut args = args();
        args.count = Some(0);
        assert!(matches!(
            resolve_generator_config(&args),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let mut args = args();
        args.config = Some(PathBuf::from("/nonexistent/generator.toml"));
        assert!(matches!(
            resolve_generator_config(&args),
            Err(CliError::Config(_))
        ));
    }
}

//! Configuration management commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use edugate_config::{ConfigLoader, EdugateConfig};

/// Output format of `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Toml,
    Json,
}

/// Show the effective configuration.
pub fn show(project: &Path, format: OutputFormat) -> Result<()> {
    let config = ConfigLoader::new()
        .with_project_dir(project)
        .load()
        .context("Failed to load configuration")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config.redacted())?;
            println!("{json}");
        }
        OutputFormat::Toml => print!("{}", config.to_toml()?),
    }

    Ok(())
}

/// Validate a single configuration file.
pub fn validate(file: &Path) -> Result<()> {
    let config = EdugateConfig::from_toml_file(file)?;
    config
        .validate()
        .with_context(|| format!("{} is invalid", file.display()))?;

    println!("{} is valid", file.display());
    Ok(())
}

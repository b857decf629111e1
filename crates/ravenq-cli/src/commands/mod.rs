//! Command implementations

mod config;
mod query;
mod shape;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use ravenq_core::config::LayeredConfig;
use std::path::Path;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Shape(args) => shape::execute(args, &output),
        Commands::Query(args) => query::execute(args, load_config(config_path)?, &output),
        Commands::Config => config::execute(&load_config(config_path)?, &output),
    }
}

/// Resolve configuration: defaults, then the optional file, then environment
fn load_config(path: Option<&Path>) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = path {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        tracing::debug!("Loaded configuration file {}", path.display());
    }

    Ok(config.load_from_env())
}

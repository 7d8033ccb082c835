//! Config command - View and validate DriveFS configuration
//!
//! Provides the `drivefs config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON) with the secret masked
//! 2. Validates the configuration file and reports every error found
//! 3. Prints the configuration file location

use anyhow::{Context, Result};
use clap::Subcommand;
use drivefs_core::config::Config;
use tracing::info;

use super::AppContext;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx),
            ConfigCommand::Validate => self.execute_validate(ctx),
            ConfigCommand::Path => {
                println!("{}", ctx.config_path.display());
                Ok(())
            }
        }
    }

    fn execute_show(&self, ctx: &AppContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = redacted(Config::load_or_default(&ctx.config_path));

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if ctx.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    fn execute_validate(&self, ctx: &AppContext) -> Result<()> {
        let formatter = ctx.formatter();

        let config = Config::load(&ctx.config_path).with_context(|| {
            format!("Failed to read {}", ctx.config_path.display())
        })?;
        let errors = config.validate();

        if ctx.is_json() {
            let details: Vec<_> = errors
                .iter()
                .map(|e| serde_json::json!({ "field": e.field, "message": e.message }))
                .collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": ctx.config_path.display().to_string(),
                "errors": details,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
        } else {
            formatter.error(&format!("{} problem(s) found", errors.len()));
            for e in &errors {
                formatter.info(&e.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Configuration is invalid")
        }
    }
}

/// Replaces the client secret so it never reaches the terminal
fn redacted(mut config: Config) -> Config {
    if config.graph.client_secret.is_some() {
        config.graph.client_secret = Some("********".to_string());
    }
    config
}

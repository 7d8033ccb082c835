//! CLI subcommands
//!
//! Every command receives an [`AppContext`] that lazily loads the
//! configuration and wires the token cache, token provider and storage
//! adapter from it.

pub mod completions;
pub mod config;
pub mod files;
pub mod info;
pub mod list;
pub mod token;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use drivefs_cache::{DatabasePool, MemoryTokenCache, SqliteTokenCache};
use drivefs_core::config::{CacheBackend, Config};
use drivefs_core::ports::ITokenCache;
use drivefs_graph::{GraphClient, GraphStorageAdapter, TokenProvider};
use tracing::debug;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Shared state handed to every command
pub struct AppContext {
    pub config_path: PathBuf,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(config_path: PathBuf, format: OutputFormat) -> Self {
        Self {
            config_path,
            format,
        }
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Loads and validates the configuration file
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load(&self.config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                self.config_path.display()
            )
        })?;

        let errors = config.validate();
        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            bail!(
                "Invalid configuration in {}: {}",
                self.config_path.display(),
                details.join("; ")
            );
        }

        Ok(config)
    }

    /// Opens the token cache selected by `cache.backend`
    pub async fn token_cache(&self, config: &Config) -> Result<Arc<dyn ITokenCache>> {
        match config.cache.backend {
            CacheBackend::Memory => Ok(Arc::new(MemoryTokenCache::new())),
            CacheBackend::Sqlite => {
                let pool = DatabasePool::new(&config.cache.path)
                    .await
                    .context("Failed to open token cache")?;
                let cache = SqliteTokenCache::new(pool.pool().clone());
                if let Err(e) = cache.purge_expired().await {
                    debug!(error = %e, "Could not purge expired tokens");
                }
                Ok(Arc::new(cache))
            }
        }
    }

    /// Builds the client-credentials token provider
    pub async fn token_provider(&self, config: &Config) -> Result<TokenProvider> {
        let credentials = config.credentials().context("Incomplete Graph credentials")?;
        let cache = self.token_cache(config).await?;
        Ok(TokenProvider::new(credentials, cache).with_authority(config.graph.authority.clone()))
    }

    /// Builds the storage adapter against the configured drive
    pub async fn adapter(&self) -> Result<GraphStorageAdapter> {
        let config = self.load_config()?;
        let credentials = config.credentials().context("Incomplete Graph credentials")?;
        let provider = self.token_provider(&config).await?;

        let client = GraphClient::with_base_url(
            &credentials,
            Arc::new(provider),
            &config.graph.api_base_url,
        );

        debug!(
            user_id = %credentials.user_id(),
            base_path = ?credentials.base_path(),
            "Storage adapter ready"
        );

        Ok(GraphStorageAdapter::new(client))
    }
}

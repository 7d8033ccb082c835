//! Configuration module for DriveFS.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Credentials, DomainError};

/// Default Microsoft Graph API root.
pub const DEFAULT_API_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Default Microsoft identity platform authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for DriveFS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Microsoft Graph application and drive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Azure AD Application (client) ID.
    pub client_id: Option<String>,
    /// Azure AD tenant ID.
    pub tenant_id: Option<String>,
    /// Client secret of the app registration.
    pub client_secret: Option<String>,
    /// User (UPN or object ID) whose drive is addressed.
    pub user_id: Option<String>,
    /// Optional folder inside the drive root that all paths are relative to.
    pub base_path: Option<String>,
    /// Graph API root, overridable for sovereign clouds and tests.
    pub api_base_url: String,
    /// Identity platform authority used for the token endpoint.
    pub authority: String,
}

/// Where access tokens are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local cache; tokens are re-acquired on every start.
    #[default]
    Memory,
    /// SQLite file shared by every process using the same path.
    Sqlite,
}

/// Token cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Database file for the `sqlite` backend.
    pub path: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/drivefs/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("drivefs")
            .join("config.yaml")
    }

    /// Build [`Credentials`] from the `graph` section.
    ///
    /// # Errors
    /// Returns `DomainError::ValidationFailed` if a required field is missing.
    pub fn credentials(&self) -> Result<Credentials, DomainError> {
        let g = &self.graph;
        let credentials = Credentials::new(
            g.client_id.clone().unwrap_or_default(),
            g.tenant_id.clone().unwrap_or_default(),
            g.client_secret.clone().unwrap_or_default(),
            g.user_id.clone().unwrap_or_default(),
        )?;

        Ok(match &g.base_path {
            Some(base) => credentials.with_base_path(base.clone()),
            None => credentials,
        })
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            tenant_id: None,
            client_secret: None,
            user_id: None,
            base_path: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("drivefs");
        Self {
            backend: CacheBackend::Memory,
            path: data_dir.join("tokens.db"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"graph.client_id"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- graph ---
        for (field, value) in [
            ("graph.client_id", &self.graph.client_id),
            ("graph.tenant_id", &self.graph.tenant_id),
            ("graph.client_secret", &self.graph.client_secret),
            ("graph.user_id", &self.graph.user_id),
        ] {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                errors.push(ValidationError {
                    field: field.into(),
                    message: "is required".into(),
                });
            }
        }

        for (field, value) in [
            ("graph.api_base_url", &self.graph.api_base_url),
            ("graph.authority", &self.graph.authority),
        ] {
            if url::Url::parse(value).is_err() {
                errors.push(ValidationError {
                    field: field.into(),
                    message: format!("not a valid URL: {value}"),
                });
            }
        }

        // --- cache ---
        if self.cache.backend == CacheBackend::Sqlite && self.cache.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "cache.path".into(),
                message: "is required for the sqlite backend".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}', expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Config`].
///
/// ```
/// use drivefs_core::config::ConfigBuilder;
///
/// let cfg = ConfigBuilder::new()
///     .graph_client_id("app-id")
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- graph ---

    pub fn graph_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.graph.client_id = Some(client_id.into());
        self
    }

    pub fn graph_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.config.graph.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn graph_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.graph.client_secret = Some(secret.into());
        self
    }

    pub fn graph_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.config.graph.user_id = Some(user_id.into());
        self
    }

    pub fn graph_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config.graph.base_path = Some(base_path.into());
        self
    }

    pub fn graph_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.graph.api_base_url = url.into();
        self
    }

    pub fn graph_authority(mut self, url: impl Into<String>) -> Self {
        self.config.graph.authority = url.into();
        self
    }

    // --- cache ---

    pub fn cache_backend(mut self, backend: CacheBackend) -> Self {
        self.config.cache.backend = backend;
        self
    }

    pub fn cache_path(mut self, path: PathBuf) -> Self {
        self.config.cache.path = path;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

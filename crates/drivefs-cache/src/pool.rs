//! SQLite connection handling for the persistent token cache
//!
//! A file-backed pool survives process restarts, so a CLI invoked many
//! times in a row reuses one access token instead of requesting a new one
//! per invocation. The in-memory variant exists for tests and for callers
//! that want SQL semantics without touching disk.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::CacheError;

/// Lock wait before a write gives up with `SQLITE_BUSY`
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Token cache traffic is a handful of point reads and upserts
const MAX_FILE_CONNECTIONS: u32 = 2;

/// Owns the SQLite pool the token cache runs its queries on
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Opens (creating if needed) the database file at `db_path`
    ///
    /// Parent directories are created, WAL mode is enabled so concurrent
    /// CLI invocations can read while one writes, and the `token_cache`
    /// table is created if missing.
    ///
    /// # Errors
    ///
    /// `CacheError::ConnectionFailed` if the directory or file cannot be
    /// opened, `CacheError::MigrationFailed` if the schema cannot be applied.
    pub async fn new(db_path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CacheError::ConnectionFailed(format!(
                    "Cannot create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_FILE_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| {
                CacheError::ConnectionFailed(format!(
                    "Cannot open token cache at {}: {}",
                    db_path.display(),
                    e
                ))
            })?;

        Self::migrate(&pool).await?;
        info!(path = %db_path.display(), "Opened token cache database");

        Ok(Self { pool })
    }

    /// Opens a private in-memory database
    ///
    /// Limited to one connection: each SQLite connection to `:memory:`
    /// would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, CacheError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| CacheError::ConnectionFailed(format!("In-memory database: {}", e)))?;

        Self::migrate(&pool).await?;
        debug!("Opened in-memory token cache database");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), CacheError> {
        sqlx::raw_sql(include_str!("migrations/20260301_token_cache.sql"))
            .execute(pool)
            .await
            .map_err(|e| CacheError::MigrationFailed(format!("token_cache schema: {}", e)))?;
        Ok(())
    }
}

//! DriveFS Cache - Access token persistence
//!
//! Key/value stores with per-entry expiry, used to keep OAuth2 access
//! tokens between requests (memory) or between process runs (SQLite).
//!
//! ## Architecture
//!
//! Both stores implement the `ITokenCache` port from `drivefs-core`. They
//! are driven (secondary) adapters in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`MemoryTokenCache`] - Process-local cache backed by a concurrent map
//! - [`DatabasePool`] - SQLite connection pool with migration support
//! - [`SqliteTokenCache`] - `ITokenCache` over the `token_cache` table
//! - [`CacheError`] - Error types for cache operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use drivefs_cache::{DatabasePool, SqliteTokenCache};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/home/user/.local/share/drivefs/tokens.db")).await?;
//! let cache = SqliteTokenCache::new(pool.pool().clone());
//! // Use cache as ITokenCache...
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod pool;
pub mod sqlite;

pub use memory::MemoryTokenCache;
pub use pool::DatabasePool;
pub use sqlite::SqliteTokenCache;

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be decoded
    #[error("Corrupt entry: {0}")]
    CorruptEntry(String),
}

impl From<sqlx::Error> for CacheError {
    fn from(e: sqlx::Error) -> Self {
        CacheError::QueryFailed(e.to_string())
    }
}

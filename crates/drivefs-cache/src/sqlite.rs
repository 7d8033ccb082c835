//! SQLite implementation of ITokenCache
//!
//! ## Type Mapping
//!
//! | Field        | SQL Type | Strategy                                      |
//! |--------------|----------|-----------------------------------------------|
//! | key          | TEXT     | Verbatim cache key                            |
//! | value        | TEXT     | Verbatim (callers store serialized JSON)      |
//! | expires_at   | TEXT     | RFC 3339, UTC, millisecond precision          |
//! | updated_at   | TEXT     | RFC 3339, UTC, millisecond precision          |
//!
//! The fixed-width UTC format keeps `expires_at` lexicographically ordered,
//! so expiry checks and purges compare strings directly in SQL.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use drivefs_core::ports::ITokenCache;

use crate::CacheError;

/// Longest lifetime stored; keeps `expires_at` within four-digit years
const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Persistent token cache over the `token_cache` table
#[derive(Clone)]
pub struct SqliteTokenCache {
    pool: SqlitePool,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SqliteTokenCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the value stored under `key` if it has not expired
    pub async fn get_entry(&self, key: &str) -> Result<Option<String>, CacheError> {
        let row = sqlx::query("SELECT value, expires_at FROM token_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row.try_get("value")?;
        let expires_at: String = row.try_get("expires_at")?;
        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|e| CacheError::CorruptEntry(format!("expires_at for {key}: {e}")))?
            .with_timezone(&Utc);

        if expires_at <= Utc::now() {
            debug!(key, "Token cache entry expired");
            self.remove_entry(key).await?;
            return Ok(None);
        }

        Ok(Some(value))
    }

    /// Stores `value` under `key` until `ttl` from now, replacing any entry
    pub async fn put_entry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl.min(MAX_TTL))
            .unwrap_or_else(|_| chrono::Duration::zero());
        let expires_at = now + ttl;

        sqlx::query(
            "INSERT INTO token_cache (key, value, expires_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(timestamp(expires_at))
        .bind(timestamp(now))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_entry(&self, key: &str) -> Result<(), CacheError> {
        sqlx::query("DELETE FROM token_cache WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM token_cache WHERE expires_at <= ?")
            .bind(timestamp(Utc::now()))
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        if removed > 0 {
            debug!(removed, "Purged expired token cache entries");
        }
        Ok(removed)
    }
}

#[async_trait]
impl ITokenCache for SqliteTokenCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.get_entry(key).await?)
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()> {
        Ok(self.put_entry(key, value, ttl).await?)
    }

    async fn forget(&self, key: &str) -> anyhow::Result<()> {
        Ok(self.remove_entry(key).await?)
    }
}

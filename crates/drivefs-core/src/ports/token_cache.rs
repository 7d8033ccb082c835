//! Token cache port (driven/secondary port)
//!
//! A minimal key-value store with per-entry time-to-live. The token
//! provider stores serialized [`AccessToken`](crate::domain::AccessToken)
//! values here so that tokens survive across adapter instances (and, with
//! a persistent backend, across processes).
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because failures are backend-specific; callers
//!   treat any error as a cache miss.
//! - No compare-and-swap: two callers may both miss and both `put`. The
//!   last write wins, which is harmless for idempotent token refreshes.

use std::time::Duration;

/// Port trait for the token cache
#[async_trait::async_trait]
pub trait ITokenCache: Send + Sync {
    /// Returns the stored value, or `None` if absent or past its TTL
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous entry
    ///
    /// The entry is no longer returned by [`get`](Self::get) once `ttl` has
    /// elapsed.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()>;

    /// Removes the entry for `key` if present
    async fn forget(&self, key: &str) -> anyhow::Result<()>;
}

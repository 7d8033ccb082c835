//! Process-local token cache

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use drivefs_core::ports::ITokenCache;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    /// `None` when `now + ttl` does not fit in an `Instant`
    deadline: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.deadline.map_or(true, |deadline| deadline > now)
    }
}

/// Concurrent in-memory cache; entries vanish with the process
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    entries: DashMap<String, Entry>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.is_live(now));
    }
}

#[async_trait]
impl ITokenCache for MemoryTokenCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(key, "Token cache entry expired");
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        }

        Ok(None)
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()> {
        let entry = Entry {
            value: value.to_string(),
            deadline: Instant::now().checked_add(ttl),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn forget(&self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

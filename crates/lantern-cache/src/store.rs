//! In-memory cache store backed by moka.
//!
//! Per-entry TTL is tracked on the entry itself and checked on read; the
//! moka-level TTL is only an upper bound on residency.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::sync::Cache;

use lantern_core::errors::CacheError;
use lantern_core::traits::CacheStore;

/// Upper bound on how long any entry may live, regardless of its own TTL.
const MAX_RESIDENCY: Duration = Duration::from_secs(86_400);

#[derive(Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local `CacheStore` used when no external backend is deployed.
pub struct MemoryCacheStore {
    cache: Cache<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(MAX_RESIDENCY)
            .build();
        Self { cache }
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self.cache.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value)),
            Some(_) => {
                self.cache.invalidate(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), entry);
        Ok(())
    }
}

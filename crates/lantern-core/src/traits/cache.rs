use std::time::Duration;

use async_trait::async_trait;

use crate::errors::CacheError;

/// TTL key-value store.
///
/// Values are opaque strings (the cache layer serializes JSON into them).
/// Implementations must expire entries at or after their TTL; callers
/// treat any error as a miss and carry on without the cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

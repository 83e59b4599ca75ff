use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use lantern_core::traits::CacheStore;

/// Typed JSON caching over an injected store.
///
/// Store failures are absorbed: a failing `get` is a miss, a failing
/// `set` is a no-op, both logged at warn. The pipeline therefore keeps
/// working (without a cache) while the backend is down.
#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn CacheStore>,
    enabled: bool,
}

impl CacheLayer {
    pub fn new(store: Arc<dyn CacheStore>, enabled: bool) -> Self {
        Self { store, enabled }
    }

    /// A layer that never caches (for tests and cache-off deployments).
    pub fn disabled(store: Arc<dyn CacheStore>) -> Self {
        Self::new(store, false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fetch and deserialize, treating every failure as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                warn!(key, %error, "cache get failed, degrading to direct call");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(error) => {
                warn!(key, %error, "cache entry did not deserialize, treating as miss");
                None
            }
        }
    }

    /// Serialize and store, best effort.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if !self.enabled {
            return;
        }
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key, %error, "cache value did not serialize, skipping");
                return;
            }
        };
        if let Err(error) = self.store.set(key, raw, ttl).await {
            warn!(key, %error, "cache set failed, continuing without cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lantern_core::errors::CacheError;

    use crate::MemoryCacheStore;

    /// A store whose backend is down.
    struct DownStore;

    #[async_trait]
    impl CacheStore for DownStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable {
                reason: "connection refused".into(),
            })
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Unavailable {
                reason: "connection refused".into(),
            })
        }
    }

    #[tokio::test]
    async fn roundtrips_json_values() {
        let layer = CacheLayer::new(Arc::new(MemoryCacheStore::new(10)), true);
        layer
            .put_json("k", &vec![1.0f32, 2.0], Duration::from_secs(60))
            .await;
        let got: Option<Vec<f32>> = layer.get_json("k").await;
        assert_eq!(got, Some(vec![1.0, 2.0]));
    }

    #[tokio::test]
    async fn unavailable_store_degrades_to_miss() {
        let layer = CacheLayer::new(Arc::new(DownStore), true);
        layer.put_json("k", &42u32, Duration::from_secs(60)).await;
        let got: Option<u32> = layer.get_json("k").await;
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn disabled_layer_never_stores() {
        let store = Arc::new(MemoryCacheStore::new(10));
        let layer = CacheLayer::disabled(store.clone());
        layer.put_json("k", &1u32, Duration::from_secs(60)).await;
        let got: Option<u32> = layer.get_json("k").await;
        assert_eq!(got, None);
        assert!(store.is_empty());
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Cache layer configuration.
///
/// Two independent caches: embeddings (long TTL, since the same text
/// embeds to the same vector) and retrieval results (short TTL, which
/// bounds staleness after new documents are ingested).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch; disabled means every call goes to the providers.
    pub enabled: bool,
    /// Embedding cache TTL in seconds.
    pub embedding_ttl_secs: u64,
    /// Retrieval-result cache TTL in seconds.
    pub retrieval_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            embedding_ttl_secs: defaults::DEFAULT_EMBEDDING_TTL_SECS,
            retrieval_ttl_secs: defaults::DEFAULT_RETRIEVAL_TTL_SECS,
        }
    }
}

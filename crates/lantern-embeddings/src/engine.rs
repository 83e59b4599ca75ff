use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lantern_cache::{embedding_key, CacheLayer};
use lantern_core::config::LanternConfig;
use lantern_core::errors::{LanternError, ProviderError};
use lantern_core::models::TokenUsage;
use lantern_core::traits::{EmbeddingProvider, LedgerStore};
use lantern_resilience::{retry, timed_provider, RetryPolicy};

use crate::keywords::KeywordExtractor;

/// What the stage hands to retrieval: the question vector, extracted
/// keywords, and the provider usage consumed producing them.
#[derive(Debug, Clone)]
pub struct QueryPrep {
    pub embedding: Vec<f32>,
    pub keywords: Vec<String>,
    pub usage: TokenUsage,
}

/// Cached alongside the vector so a cache hit needs zero provider calls.
#[derive(Serialize, Deserialize)]
struct CachedEmbedding {
    vector: Vec<f32>,
    keywords: Vec<String>,
}

/// The embedding & keyword stage.
///
/// Cache hit: cached vector and keywords, no provider traffic.
/// Cache miss: the embedding call (mandatory) and the keyword call
/// (best-effort) run as two spawned tasks joined at one barrier; actual
/// reported usage is recorded in the ledger before the stage returns.
#[derive(Clone)]
pub struct EmbeddingStage {
    provider: Arc<dyn EmbeddingProvider>,
    keywords: KeywordExtractor,
    cache: CacheLayer,
    ledger: Arc<dyn LedgerStore>,
    policy: RetryPolicy,
    timeout_secs: u64,
    embedding_ttl: Duration,
}

impl EmbeddingStage {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        keywords: KeywordExtractor,
        cache: CacheLayer,
        ledger: Arc<dyn LedgerStore>,
        config: &LanternConfig,
    ) -> Self {
        Self {
            provider,
            keywords,
            cache,
            ledger,
            policy: RetryPolicy::provider(&config.retry),
            timeout_secs: config.retry.provider_timeout_secs,
            embedding_ttl: Duration::from_secs(config.cache.embedding_ttl_secs),
        }
    }

    /// Resolve normalized question text into a vector and keywords.
    pub async fn resolve(
        &self,
        identity: &str,
        normalized_text: &str,
    ) -> Result<QueryPrep, LanternError> {
        let key = embedding_key(normalized_text);

        if let Some(cached) = self.cache.get_json::<CachedEmbedding>(&key).await {
            debug!(provider = self.provider.name(), "embedding cache hit");
            return Ok(QueryPrep {
                embedding: cached.vector,
                keywords: cached.keywords,
                usage: TokenUsage::default(),
            });
        }

        // Fan out: both calls run concurrently and join at this barrier.
        let embed_task = {
            let provider = self.provider.clone();
            let policy = self.policy.clone();
            let timeout_secs = self.timeout_secs;
            let text = normalized_text.to_string();
            tokio::spawn(async move {
                retry(&policy, "embed", || {
                    timed_provider(timeout_secs, provider.embed(&text))
                })
                .await
            })
        };
        let keyword_task = {
            let extractor = self.keywords.clone();
            let text = normalized_text.to_string();
            tokio::spawn(async move { extractor.extract(&text).await })
        };

        let (embed_result, keyword_result) = tokio::join!(embed_task, keyword_task);

        // The embedding is mandatory; a crashed task counts as provider loss.
        let response = match embed_result {
            Ok(result) => result?,
            Err(join_error) => {
                warn!(%join_error, "embedding task aborted");
                return Err(ProviderError::Unavailable {
                    provider: self.provider.name().to_string(),
                }
                .into());
            }
        };

        // Keywords are optional; a crashed task degrades to an empty list.
        let (keywords, keyword_usage) = match keyword_result {
            Ok(pair) => pair,
            Err(join_error) => {
                warn!(%join_error, "keyword task aborted, continuing without keywords");
                (Vec::new(), TokenUsage::default())
            }
        };

        let usage = response.usage + keyword_usage;
        if let Err(error) = self.ledger.record(identity, usage).await {
            warn!(identity, %error, "ledger record failed, usage not accounted");
        }

        self.cache
            .put_json(
                &key,
                &CachedEmbedding {
                    vector: response.vector.clone(),
                    keywords: keywords.clone(),
                },
                self.embedding_ttl,
            )
            .await;

        debug!(
            provider = self.provider.name(),
            dims = response.vector.len(),
            keywords = keywords.len(),
            prompt_tokens = usage.prompt_tokens,
            "embedding stage resolved"
        );

        Ok(QueryPrep {
            embedding: response.vector,
            keywords,
            usage,
        })
    }
}

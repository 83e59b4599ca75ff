use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use lantern_cache::{retrieval_key, CacheLayer};
use lantern_core::config::SearchConfig;
use lantern_core::errors::{IndexError, LanternError};
use lantern_core::models::RetrievalCandidate;
use lantern_core::traits::{IndexSearchParams, VectorIndex};
use lantern_resilience::{retry, timed_index, RetryPolicy};

use crate::params;

/// The adaptive retrieval engine.
///
/// One primary search with length-adaptive parameters; if it yields zero
/// usable candidates, exactly one fallback search at the threshold floor.
/// Each search call is cached by (embedding hash, limit, threshold) and
/// retried under the index policy.
#[derive(Clone)]
pub struct RetrievalEngine {
    index: Arc<dyn VectorIndex>,
    cache: CacheLayer,
    config: SearchConfig,
    policy: RetryPolicy,
    timeout_secs: u64,
    retrieval_ttl: Duration,
}

impl RetrievalEngine {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        cache: CacheLayer,
        config: SearchConfig,
        policy: RetryPolicy,
        timeout_secs: u64,
        retrieval_ttl: Duration,
    ) -> Self {
        Self {
            index,
            cache,
            config,
            policy,
            timeout_secs,
            retrieval_ttl,
        }
    }

    /// Retrieve candidates for a question embedding.
    ///
    /// `normalized_chars` is the normalized question length, which picks
    /// the search profile. Returned candidates carry `vector_score` and
    /// `original_rank`; keyword bonuses are applied later by ranking.
    pub async fn retrieve(
        &self,
        embedding: &[f32],
        normalized_chars: usize,
    ) -> Result<Vec<RetrievalCandidate>, LanternError> {
        let primary = params::profile_for(normalized_chars, &self.config);
        let candidates = self.search_cached(embedding, primary).await?;

        if !candidates.is_empty() {
            info!(
                candidates = candidates.len(),
                limit = primary.limit,
                min_score = primary.min_score,
                "retrieval complete"
            );
            return Ok(candidates);
        }

        // Degraded recall: one fallback at the floor, never more.
        let fallback = params::fallback_params(primary, &self.config);
        debug!(
            min_score = fallback.min_score,
            limit = fallback.limit,
            "primary search empty, single fallback at threshold floor"
        );
        let candidates = self.search_cached(embedding, fallback).await?;
        info!(
            candidates = candidates.len(),
            min_score = fallback.min_score,
            used_fallback = true,
            "retrieval complete"
        );
        Ok(candidates)
    }

    /// One search call: cache lookup, index call under retry + timeout,
    /// cache store. The cached value is the pre-rerank candidate list.
    async fn search_cached(
        &self,
        embedding: &[f32],
        search: IndexSearchParams,
    ) -> Result<Vec<RetrievalCandidate>, LanternError> {
        let key = retrieval_key(embedding, search.limit, search.min_score);
        if let Some(cached) = self.cache.get_json::<Vec<RetrievalCandidate>>(&key).await {
            debug!(limit = search.limit, min_score = search.min_score, "retrieval cache hit");
            return Ok(cached);
        }

        let hits = retry(&self.policy, "index_search", || {
            timed_index(self.timeout_secs, self.index.search(embedding, search))
        })
        .await
        .map_err(|error| {
            LanternError::Index(IndexError::Unavailable {
                reason: error.to_string(),
            })
        })?;

        let candidates: Vec<RetrievalCandidate> = hits
            .into_iter()
            .enumerate()
            .map(|(rank, hit)| {
                RetrievalCandidate::from_hit(
                    hit.chunk_id,
                    hit.source_document_id,
                    hit.chunk_index,
                    hit.text,
                    hit.score,
                    rank,
                )
            })
            .collect();

        self.cache
            .put_json(&key, &candidates, self.retrieval_ttl)
            .await;
        Ok(candidates)
    }
}

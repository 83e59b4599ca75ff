use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Questions at or below this many characters use the wide profile.
    pub short_query_max_chars: usize,
    /// Result limit for short queries.
    pub short_query_limit: usize,
    /// Minimum similarity for short queries.
    pub short_query_min_score: f32,
    /// Result limit for everything else.
    pub normal_query_limit: usize,
    /// Minimum similarity for everything else.
    pub normal_query_min_score: f32,
    /// Threshold floor for the single fallback search.
    pub fallback_min_score: f32,
    /// HNSW recall/latency parameter, passed through on every call.
    pub ef_search: usize,
    /// Candidates kept per source document before truncation.
    pub max_per_source: usize,
    /// Candidates kept after reranking.
    pub final_top_k: usize,
    /// Jaccard similarity above which candidates are collapsed.
    pub dedup_similarity: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            short_query_max_chars: constants::SHORT_QUERY_MAX_CHARS,
            short_query_limit: defaults::DEFAULT_SHORT_QUERY_LIMIT,
            short_query_min_score: defaults::DEFAULT_SHORT_QUERY_MIN_SCORE,
            normal_query_limit: defaults::DEFAULT_NORMAL_QUERY_LIMIT,
            normal_query_min_score: defaults::DEFAULT_NORMAL_QUERY_MIN_SCORE,
            fallback_min_score: defaults::DEFAULT_FALLBACK_MIN_SCORE,
            ef_search: constants::HNSW_EF_SEARCH,
            max_per_source: constants::MAX_PER_SOURCE,
            final_top_k: constants::FINAL_TOP_K,
            dedup_similarity: constants::DEDUP_SIMILARITY,
        }
    }
}

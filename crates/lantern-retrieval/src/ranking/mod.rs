//! RankingPipeline: dedup → per-source cap → keyword bonus → order → top-K.

pub mod dedup;
pub mod scorer;

use lantern_core::config::SearchConfig;
use lantern_core::models::RetrievalCandidate;
use tracing::debug;

/// Full rerank pipeline over raw retrieval candidates.
pub struct RankingPipeline {
    config: SearchConfig,
}

impl RankingPipeline {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Rerank candidates against the extracted keywords.
    ///
    /// Deterministic: identical candidates and keywords always produce
    /// the same ordered output.
    pub fn rank(
        &self,
        candidates: Vec<RetrievalCandidate>,
        keywords: &[String],
    ) -> Vec<RetrievalCandidate> {
        let before = candidates.len();

        // Stage 1: collapse near-identical texts, keep the best of each.
        let candidates = dedup::collapse_near_duplicates(candidates, self.config.dedup_similarity);

        // Stage 2: cap density per source document.
        let mut candidates = dedup::cap_per_source(candidates, self.config.max_per_source);

        // Stage 3: keyword bonuses into the composite score.
        scorer::apply_keyword_bonus(&mut candidates, keywords);

        // Stage 4: reproducible ordering.
        scorer::sort_deterministic(&mut candidates);

        // Stage 5: keep the head.
        candidates.truncate(self.config.final_top_k);

        debug!(
            before,
            after = candidates.len(),
            keywords = keywords.len(),
            "ranking pipeline complete"
        );
        candidates
    }
}

impl Default for RankingPipeline {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

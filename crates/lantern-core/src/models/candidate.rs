use serde::{Deserialize, Serialize};

/// A retrieved chunk, scored.
///
/// Created per retrieval call, immutable once ranked, discarded when the
/// request completes. `vector_score` comes from the index; the rerank
/// stage fills `keyword_bonus` and `composite_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    pub chunk_id: String,
    pub source_document_id: String,
    /// Position of the chunk within its source document.
    pub chunk_index: u32,
    pub text: String,
    pub vector_score: f32,
    pub keyword_bonus: f32,
    pub composite_score: f32,
    /// Rank in the raw vector-search result (0 = best), used as the first
    /// tie-breaker so reranking is reproducible.
    pub original_rank: usize,
}

impl RetrievalCandidate {
    /// Build a candidate fresh from an index hit, before reranking.
    pub fn from_hit(
        chunk_id: String,
        source_document_id: String,
        chunk_index: u32,
        text: String,
        vector_score: f32,
        original_rank: usize,
    ) -> Self {
        Self {
            chunk_id,
            source_document_id,
            chunk_index,
            text,
            vector_score,
            keyword_bonus: 0.0,
            composite_score: vector_score,
            original_rank,
        }
    }
}

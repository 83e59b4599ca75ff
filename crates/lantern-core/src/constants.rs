//! Workspace-wide constants that are not meant to be tuned per deployment.
//!
//! Deployment-tunable values live in [`crate::config`] with these as the
//! serde defaults.

/// Hard ceiling on question length, in characters. Longer input is
/// rejected before any external call is made.
pub const MAX_QUESTION_CHARS: usize = 10_000;

/// Questions at or below this many characters (after trimming) use the
/// wide-recall search profile.
pub const SHORT_QUERY_MAX_CHARS: usize = 6;

/// Recall/latency trade-off parameter passed to the vector index on every
/// search call.
pub const HNSW_EF_SEARCH: usize = 128;

/// Similarity above which two candidate texts are considered duplicates.
pub const DEDUP_SIMILARITY: f64 = 0.95;

/// Maximum surviving candidates per source document before truncation.
pub const MAX_PER_SOURCE: usize = 5;

/// Candidates kept after reranking.
pub const FINAL_TOP_K: usize = 3;

/// Context assembly token ceiling.
pub const CONTEXT_TOKEN_BUDGET: usize = 2_500;

/// Relevance boost for an exact keyword token match.
pub const EXACT_MATCH_BOOST: f32 = 0.15;

/// Relevance boost for a partial (substring) keyword match.
pub const PARTIAL_MATCH_BOOST: f32 = 0.10;

/// Ceiling on the stacked keyword bonus for a single candidate.
pub const MAX_KEYWORD_BONUS: f32 = 0.30;

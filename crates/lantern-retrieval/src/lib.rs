//! Retrieval: length-adaptive vector search with an exactly-once
//! fallback, near-duplicate collapse, keyword-aware reranking, and
//! greedy context assembly under a token ceiling.

mod context;
mod engine;
mod params;
pub mod ranking;

pub use context::ContextAssembler;
pub use engine::RetrievalEngine;
pub use params::{fallback_params, profile_for};
pub use ranking::RankingPipeline;

//! Embedding & keyword stage.
//!
//! Turns normalized question text into a vector plus an optional keyword
//! list. The embedding call is mandatory and cached; keyword extraction
//! is best-effort and degrades silently to an empty list. Both calls are
//! launched concurrently and joined at a single barrier.

mod engine;
mod keywords;

pub use engine::{EmbeddingStage, QueryPrep};
pub use keywords::KeywordExtractor;

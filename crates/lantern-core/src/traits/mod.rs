//! Trait seams for every external collaborator.
//!
//! Injected services with per-key atomic semantics, never process-wide
//! singletons, so the pipeline is testable with in-memory fakes.

mod cache;
mod completion;
mod embedding;
mod index;
mod ledger;

pub use cache::CacheStore;
pub use completion::{
    CompletionChunk, CompletionProvider, CompletionRequest, CompletionResponse, CompletionStream,
};
pub use embedding::{EmbeddingProvider, EmbeddingResponse};
pub use index::{IndexHit, IndexSearchParams, VectorIndex};
pub use ledger::{LedgerStore, QuotaVerdict, UsageSnapshot};

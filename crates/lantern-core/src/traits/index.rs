use async_trait::async_trait;

use crate::errors::IndexError;

/// Parameters for one vector-index search call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexSearchParams {
    pub limit: usize,
    pub min_score: f32,
    /// HNSW recall/latency trade-off parameter.
    pub ef_search: usize,
}

/// One raw hit from the index, before any reranking.
#[derive(Debug, Clone)]
pub struct IndexHit {
    pub chunk_id: String,
    pub source_document_id: String,
    pub chunk_index: u32,
    pub text: String,
    pub score: f32,
}

/// Approximate-nearest-neighbor search over the chunk corpus.
///
/// Upserts and deletes belong to the document-ingestion collaborator and
/// are deliberately absent here.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(
        &self,
        vector: &[f32],
        params: IndexSearchParams,
    ) -> Result<Vec<IndexHit>, IndexError>;
}

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::TokenUsage;

/// A successful embedding call.
#[derive(Debug, Clone)]
pub struct EmbeddingResponse {
    pub vector: Vec<f32>,
    /// Actual usage reported by the provider (completion side is zero).
    pub usage: TokenUsage,
}

/// Embedding generation provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text, returning the vector and reported usage.
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse, ProviderError>;

    /// Human-readable provider name, for logs.
    fn name(&self) -> &str;
}

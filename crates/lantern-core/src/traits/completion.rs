use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::ProviderError;
use crate::models::{TokenUsage, Turn};

/// A chat-completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    /// Conversation messages, oldest first, ending with the user prompt.
    pub messages: Vec<Turn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A non-streaming completion result.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
}

/// One element of a streaming completion.
///
/// Content arrives in `delta`; the provider's usage report arrives in a
/// trailing chunk with `usage` set (and usually no delta).
#[derive(Debug, Clone, Default)]
pub struct CompletionChunk {
    pub delta: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Streaming completions are delivered over a bounded channel; dropping
/// the receiver tells the adapter to stop pulling from the provider.
pub type CompletionStream = mpsc::Receiver<Result<CompletionChunk, ProviderError>>;

/// Language-model completion provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// One-shot completion (used for keyword extraction).
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, ProviderError>;

    /// Streaming completion. The returned channel yields token fragments
    /// in arrival order, then a usage chunk, then closes.
    async fn stream(&self, request: CompletionRequest) -> Result<CompletionStream, ProviderError>;

    /// Human-readable provider name, for logs.
    fn name(&self) -> &str;
}

//! Concrete adapters for the external collaborators: an
//! OpenAI-compatible model provider (embeddings + completions, streaming
//! via SSE) and a Qdrant REST vector index.

mod openai;
mod qdrant;

pub use openai::{OpenAiClient, OpenAiConfig};
pub use qdrant::{QdrantConfig, QdrantIndex};

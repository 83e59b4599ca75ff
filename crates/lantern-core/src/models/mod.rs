//! Data model shared across the pipeline stages.

mod answer;
mod candidate;
mod context_window;
mod query;
mod token_usage;

pub use answer::{AnswerEvent, CompletedAnswer, SourceRef, UsageReport};
pub use candidate::RetrievalCandidate;
pub use context_window::ContextWindow;
pub use query::{Query, Role, Turn};
pub use token_usage::TokenUsage;

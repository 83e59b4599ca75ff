//! Streaming answer generation.
//!
//! `AnswerEngine::stream_answer` is the one operation exposed to the
//! chat-serving layer: it drives validation, quota gating, the
//! embedding/keyword fan-out, retrieval, reranking, context assembly,
//! and the cancellable streaming completion, and guarantees exactly one
//! terminal event on the returned stream in every outcome.

mod engine;
mod phase;
mod prompt;
mod stream;

pub use engine::{AnswerEngine, Services};
pub use phase::Phase;
pub use stream::{AnswerStream, CancellationToken};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token_usage::TokenUsage;
use crate::errors::ErrorKind;

/// A document/chunk reference cited by the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub document_id: String,
    pub chunk_id: String,
    pub score: f32,
}

/// Token accounting for the whole request, broken down by call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UsageReport {
    pub embedding: TokenUsage,
    pub completion: TokenUsage,
}

impl UsageReport {
    pub fn total_tokens(&self) -> u32 {
        self.embedding.total() + self.completion.total()
    }
}

/// Payload of a successful terminal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedAnswer {
    pub sources: Vec<SourceRef>,
    pub usage: UsageReport,
    pub conversation_id: Uuid,
}

/// One event on an answer stream.
///
/// A stream is zero or more `Fragment`s followed by exactly one terminal
/// event (`Completed` or `Failed`) in every outcome, including
/// cancellation (`Failed` with kind `Cancelled`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerEvent {
    Fragment { content: String },
    Completed(CompletedAnswer),
    Failed { kind: ErrorKind, message: String },
}

impl AnswerEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnswerEvent::Fragment { .. })
    }
}

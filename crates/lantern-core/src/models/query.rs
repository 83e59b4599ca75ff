use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LanternError;

/// Speaker role for a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One prior conversation turn, supplied by the chat-serving layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// An incoming question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// The question text.
    pub text: String,
    /// Identity the quota ledger is keyed by.
    pub identity: String,
    /// Conversation this question belongs to; generated when absent.
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<Turn>,
    /// Completion token cap override.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature override.
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Query {
    /// Minimal constructor for the common case.
    pub fn new(text: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            identity: identity.into(),
            conversation_id: None,
            history: Vec::new(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Reject empty and over-ceiling input before any external call.
    pub fn validate(&self, max_chars: usize) -> Result<(), LanternError> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Err(LanternError::MalformedQuery {
                reason: "question is empty".to_string(),
            });
        }
        let chars = self.text.chars().count();
        if chars > max_chars {
            return Err(LanternError::MalformedQuery {
                reason: format!("question is {chars} characters, limit is {max_chars}"),
            });
        }
        Ok(())
    }

    /// Canonical form used for cache keys and length-adaptive search:
    /// trimmed and case-folded.
    pub fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_question_rejected() {
        let q = Query::new("   ", "user-1");
        assert!(q.validate(10_000).is_err());
    }

    #[test]
    fn oversized_question_rejected() {
        let q = Query::new("x".repeat(10_001), "user-1");
        assert!(q.validate(10_000).is_err());
        let q = Query::new("x".repeat(10_000), "user-1");
        assert!(q.validate(10_000).is_ok());
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        let q = Query::new("  What Is Our Refund Policy?  ", "user-1");
        assert_eq!(q.normalized_text(), "what is our refund policy?");
    }
}

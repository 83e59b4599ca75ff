use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Answer generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Sampling temperature when the query does not set one.
    pub default_temperature: f32,
    /// Completion token cap when the query does not set one.
    pub default_max_tokens: u32,
    /// Context assembly token ceiling.
    pub context_token_budget: usize,
    /// Temperature for the keyword-extraction call.
    pub keyword_temperature: f32,
    /// Token cap for the keyword-extraction call.
    pub keyword_max_tokens: u32,
    /// Keywords kept from the extraction response.
    pub max_keywords: usize,
    /// Hard ceiling on question length, in characters.
    pub max_question_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_temperature: defaults::DEFAULT_TEMPERATURE,
            default_max_tokens: defaults::DEFAULT_MAX_COMPLETION_TOKENS,
            context_token_budget: constants::CONTEXT_TOKEN_BUDGET,
            keyword_temperature: defaults::DEFAULT_KEYWORD_TEMPERATURE,
            keyword_max_tokens: defaults::DEFAULT_KEYWORD_MAX_TOKENS,
            max_keywords: defaults::DEFAULT_MAX_KEYWORDS,
            max_question_chars: constants::MAX_QUESTION_CHARS,
        }
    }
}

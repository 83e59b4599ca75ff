use std::sync::Arc;

use tracing::{debug, warn};

use lantern_core::config::LanternConfig;
use lantern_core::models::{Role, TokenUsage, Turn};
use lantern_core::traits::{CompletionProvider, CompletionRequest};
use lantern_resilience::{retry, timed_provider, RetryPolicy};

const KEYWORD_SYSTEM: &str = "You extract search keywords from questions. \
Reply with only the keywords, comma-separated, no explanations.";

/// Best-effort keyword extraction via a one-shot completion call.
///
/// Failure is absorbed: the stage gets an empty keyword list and the
/// request proceeds without keyword bonuses.
#[derive(Clone)]
pub struct KeywordExtractor {
    completion: Arc<dyn CompletionProvider>,
    policy: RetryPolicy,
    timeout_secs: u64,
    temperature: f32,
    max_tokens: u32,
    max_keywords: usize,
}

impl KeywordExtractor {
    pub fn new(completion: Arc<dyn CompletionProvider>, config: &LanternConfig) -> Self {
        Self {
            completion,
            policy: RetryPolicy::provider(&config.retry),
            timeout_secs: config.retry.provider_timeout_secs,
            temperature: config.generation.keyword_temperature,
            max_tokens: config.generation.keyword_max_tokens,
            max_keywords: config.generation.max_keywords,
        }
    }

    /// Extract up to `max_keywords` keywords. Never fails: any error is
    /// logged and converted to an empty list with zero usage.
    pub async fn extract(&self, question: &str) -> (Vec<String>, TokenUsage) {
        let request = CompletionRequest {
            system: KEYWORD_SYSTEM.to_string(),
            messages: vec![Turn {
                role: Role::User,
                content: format!(
                    "Extract up to {} search keywords from this question: {}",
                    self.max_keywords, question
                ),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let result = retry(&self.policy, "extract_keywords", || {
            timed_provider(self.timeout_secs, self.completion.complete(request.clone()))
        })
        .await;

        match result {
            Ok(response) => {
                let keywords = parse_keywords(&response.content, self.max_keywords);
                debug!(?keywords, "extracted keywords");
                (keywords, response.usage)
            }
            Err(error) => {
                warn!(%error, "keyword extraction failed, continuing without keywords");
                (Vec::new(), TokenUsage::default())
            }
        }
    }
}

/// Parse a comma-separated keyword response, lowercased, at most `max`.
fn parse_keywords(content: &str, max: usize) -> Vec<String> {
    content
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_list() {
        assert_eq!(
            parse_keywords("Refund, Policy , Enterprise", 3),
            vec!["refund", "policy", "enterprise"]
        );
    }

    #[test]
    fn truncates_to_max() {
        assert_eq!(parse_keywords("a, b, c, d, e", 3), vec!["a", "b", "c"]);
    }

    #[test]
    fn skips_empty_segments() {
        assert_eq!(parse_keywords(" , refund,, ", 3), vec!["refund"]);
    }

    #[test]
    fn empty_response_yields_no_keywords() {
        assert!(parse_keywords("", 3).is_empty());
    }
}

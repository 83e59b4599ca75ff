use std::sync::Arc;

use tracing::debug;

use lantern_core::models::{ContextWindow, RetrievalCandidate};
use lantern_tokens::TokenCounter;

/// Greedy first-fit context assembly under a fixed token ceiling.
///
/// Walks the ranked candidates in order and admits each whole candidate
/// whose estimated cost fits the remaining budget. Candidates are never
/// split; a candidate that does not fit is skipped and the walk
/// continues. Zero admitted candidates is a valid degraded state.
#[derive(Clone)]
pub struct ContextAssembler {
    counter: Arc<TokenCounter>,
    token_budget: usize,
}

impl ContextAssembler {
    pub fn new(counter: Arc<TokenCounter>, token_budget: usize) -> Self {
        Self {
            counter,
            token_budget,
        }
    }

    pub fn assemble(&self, ranked: &[RetrievalCandidate]) -> ContextWindow {
        let mut window = ContextWindow::new(self.token_budget);
        for candidate in ranked {
            let cost = self.counter.count_cached(&candidate.text);
            if !window.try_push(candidate.clone(), cost) {
                debug!(
                    chunk_id = %candidate.chunk_id,
                    cost,
                    used = window.used_tokens(),
                    budget = self.token_budget,
                    "candidate does not fit context budget, skipping"
                );
            }
        }
        debug!(
            selected = window.len(),
            used_tokens = window.used_tokens(),
            budget = self.token_budget,
            "context assembled"
        );
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, text: &str) -> RetrievalCandidate {
        RetrievalCandidate::from_hit(
            id.to_string(),
            "doc-1".to_string(),
            0,
            text.to_string(),
            0.9,
            0,
        )
    }

    #[test]
    fn stays_within_budget() {
        let assembler = ContextAssembler::new(Arc::new(TokenCounter::default()), 20);
        let ranked = vec![
            candidate("a", "short chunk of text"),
            candidate("b", "another short chunk"),
            candidate("c", "a third chunk that may not fit the remaining budget at all"),
        ];
        let window = assembler.assemble(&ranked);
        assert!(window.used_tokens() <= 20);
    }

    #[test]
    fn oversized_candidate_yields_empty_window() {
        let assembler = ContextAssembler::new(Arc::new(TokenCounter::default()), 3);
        let ranked = vec![candidate(
            "a",
            "this text is comfortably longer than a three token budget",
        )];
        let window = assembler.assemble(&ranked);
        assert!(window.is_empty());
    }

    #[test]
    fn skips_oversized_and_admits_later_fit() {
        let counter = Arc::new(TokenCounter::default());
        let big = "word ".repeat(50);
        let small = "tiny chunk";
        let budget = counter.count(small) + 2;
        let assembler = ContextAssembler::new(counter, budget);
        let window = assembler.assemble(&[candidate("big", &big), candidate("small", small)]);
        assert_eq!(window.len(), 1);
        assert_eq!(window.candidates().next().unwrap().chunk_id, "small");
    }
}

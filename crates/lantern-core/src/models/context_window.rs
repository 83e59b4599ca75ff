use serde::{Deserialize, Serialize};

use super::answer::SourceRef;
use super::candidate::RetrievalCandidate;

/// The ranked candidates selected for the prompt, under a token ceiling.
///
/// Owned by one request. Candidates are admitted whole or not at all; the
/// cumulative estimated cost never exceeds the budget. An empty window is
/// a valid degraded state; the generator proceeds without citations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextWindow {
    entries: Vec<(RetrievalCandidate, usize)>,
    token_budget: usize,
    used_tokens: usize,
}

impl ContextWindow {
    pub fn new(token_budget: usize) -> Self {
        Self {
            entries: Vec::new(),
            token_budget,
            used_tokens: 0,
        }
    }

    /// Admit a whole candidate if its estimated cost fits the remaining
    /// budget. Returns whether it was admitted.
    pub fn try_push(&mut self, candidate: RetrievalCandidate, estimated_tokens: usize) -> bool {
        if self.used_tokens + estimated_tokens > self.token_budget {
            return false;
        }
        self.used_tokens += estimated_tokens;
        self.entries.push((candidate, estimated_tokens));
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn used_tokens(&self) -> usize {
        self.used_tokens
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    /// Candidates in admission order.
    pub fn candidates(&self) -> impl Iterator<Item = &RetrievalCandidate> {
        self.entries.iter().map(|(c, _)| c)
    }

    /// Citation list for the terminal answer event.
    pub fn sources(&self) -> Vec<SourceRef> {
        self.entries
            .iter()
            .map(|(c, _)| SourceRef {
                document_id: c.source_document_id.clone(),
                chunk_id: c.chunk_id.clone(),
                score: c.composite_score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> RetrievalCandidate {
        RetrievalCandidate::from_hit(
            id.to_string(),
            "doc-1".to_string(),
            0,
            "some text".to_string(),
            0.8,
            0,
        )
    }

    #[test]
    fn admits_whole_candidates_within_budget() {
        let mut w = ContextWindow::new(100);
        assert!(w.try_push(candidate("a"), 60));
        assert!(w.try_push(candidate("b"), 40));
        assert_eq!(w.used_tokens(), 100);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn rejects_candidate_that_would_exceed_budget() {
        let mut w = ContextWindow::new(100);
        assert!(w.try_push(candidate("a"), 80));
        assert!(!w.try_push(candidate("b"), 21));
        assert_eq!(w.len(), 1);
        assert!(w.used_tokens() <= w.token_budget());
    }

    #[test]
    fn empty_window_is_valid() {
        let mut w = ContextWindow::new(10);
        assert!(!w.try_push(candidate("a"), 11));
        assert!(w.is_empty());
        assert!(w.sources().is_empty());
    }
}

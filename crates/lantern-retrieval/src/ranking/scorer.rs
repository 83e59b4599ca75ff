//! Keyword bonuses and the deterministic ordering.

use std::collections::HashSet;

use lantern_core::constants::{EXACT_MATCH_BOOST, MAX_KEYWORD_BONUS, PARTIAL_MATCH_BOOST};
use lantern_core::models::RetrievalCandidate;

/// Apply keyword bonuses into `composite_score`.
///
/// Per keyword: an exact case-insensitive token match is worth +15% of
/// the vector score, a substring match +10%. Bonuses stack additively
/// across keywords but the total is clamped at +30% so keyword overlap
/// cannot drown the vector ordering.
pub fn apply_keyword_bonus(candidates: &mut [RetrievalCandidate], keywords: &[String]) {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    for candidate in candidates.iter_mut() {
        let text_lower = candidate.text.to_lowercase();
        let tokens: HashSet<&str> = text_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut bonus = 0.0f32;
        for keyword in &keywords {
            if tokens.contains(keyword.as_str()) {
                bonus += EXACT_MATCH_BOOST;
            } else if text_lower.contains(keyword.as_str()) {
                bonus += PARTIAL_MATCH_BOOST;
            }
        }
        candidate.keyword_bonus = bonus.min(MAX_KEYWORD_BONUS);
        candidate.composite_score = candidate.vector_score * (1.0 + candidate.keyword_bonus);
    }
}

/// Sort for reproducible output: composite score descending, ties broken
/// by original vector rank, then source document, then chunk position.
pub fn sort_deterministic(candidates: &mut [RetrievalCandidate]) {
    candidates.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.original_rank.cmp(&b.original_rank))
            .then(a.source_document_id.cmp(&b.source_document_id))
            .then(a.chunk_index.cmp(&b.chunk_index))
    });
}

//! Near-duplicate collapse and per-source density capping.

use std::collections::{HashMap, HashSet};

use lantern_core::models::RetrievalCandidate;

/// Jaccard similarity over lowercase word sets.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = words(a).collect();
    let set_b: HashSet<String> = words(b).collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Collapse candidates whose texts are near-identical (similarity above
/// the threshold), keeping only the highest-scoring representative.
pub fn collapse_near_duplicates(
    mut candidates: Vec<RetrievalCandidate>,
    threshold: f64,
) -> Vec<RetrievalCandidate> {
    // Best first, so the representative of each duplicate group is the
    // highest-scoring member; rank breaks score ties stably.
    candidates.sort_by(|a, b| {
        b.vector_score
            .partial_cmp(&a.vector_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.original_rank.cmp(&b.original_rank))
    });

    let mut kept: Vec<RetrievalCandidate> = Vec::new();
    'outer: for candidate in candidates {
        for representative in &kept {
            if text_similarity(&representative.text, &candidate.text) > threshold {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }
    kept
}

/// Keep at most `max_per_source` candidates per source document.
/// Input must already be ordered best-first.
pub fn cap_per_source(
    candidates: Vec<RetrievalCandidate>,
    max_per_source: usize,
) -> Vec<RetrievalCandidate> {
    let mut per_source: HashMap<String, usize> = HashMap::new();
    candidates
        .into_iter()
        .filter(|candidate| {
            let count = per_source
                .entry(candidate.source_document_id.clone())
                .or_insert(0);
            *count += 1;
            *count <= max_per_source
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, source: &str, text: &str, score: f32, rank: usize) -> RetrievalCandidate {
        RetrievalCandidate::from_hit(
            id.to_string(),
            source.to_string(),
            rank as u32,
            text.to_string(),
            score,
            rank,
        )
    }

    #[test]
    fn identical_texts_have_similarity_one() {
        assert!((text_similarity("refund policy terms", "refund policy terms") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_texts_have_similarity_zero() {
        assert_eq!(text_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn similarity_ignores_case_and_punctuation() {
        assert!((text_similarity("Refund, policy!", "refund policy") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn near_duplicates_collapse_to_best() {
        // 24 distinct words; one extra word on the copy puts the pair at
        // Jaccard 24/25 = 0.96, just above the 0.95 threshold.
        let shared = "the refund window is thirty days for enterprise accounts and \
                      fourteen for individual customers per signed contract terms \
                      unless a regional statute requires longer coverage";
        let near = format!("{shared} today");
        let survivors = collapse_near_duplicates(
            vec![
                candidate("low", "d1", shared, 0.70, 1),
                candidate("high", "d2", &near, 0.85, 0),
            ],
            0.95,
        );
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].chunk_id, "high");
    }

    #[test]
    fn distinct_texts_all_survive() {
        let survivors = collapse_near_duplicates(
            vec![
                candidate("a", "d1", "refund policy for enterprise customers", 0.9, 0),
                candidate("b", "d2", "shipping times for european orders", 0.8, 1),
            ],
            0.95,
        );
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn per_source_cap_drops_excess() {
        let candidates: Vec<_> = (0..8)
            .map(|i| {
                candidate(
                    &format!("c{i}"),
                    "same-doc",
                    &format!("chunk number {i} entirely distinct content"),
                    0.9 - i as f32 * 0.05,
                    i,
                )
            })
            .collect();
        let capped = cap_per_source(candidates, 5);
        assert_eq!(capped.len(), 5);
        // Highest-scoring five survive.
        assert_eq!(capped[0].chunk_id, "c0");
        assert_eq!(capped[4].chunk_id, "c4");
    }

    #[test]
    fn cap_is_per_source_not_global() {
        let mut candidates = Vec::new();
        for i in 0..6 {
            candidates.push(candidate(
                &format!("a{i}"),
                "doc-a",
                &format!("doc a chunk {i} distinct words here"),
                0.9,
                i,
            ));
            candidates.push(candidate(
                &format!("b{i}"),
                "doc-b",
                &format!("doc b chunk {i} other words entirely"),
                0.9,
                6 + i,
            ));
        }
        let capped = cap_per_source(candidates, 5);
        assert_eq!(capped.len(), 10);
    }
}

//! Property suites for the rerank invariants: determinism, the dedup
//! similarity bound, the per-source cap, and the context budget.

use std::sync::{Arc, OnceLock};

use proptest::prelude::*;

use lantern_core::config::SearchConfig;
use lantern_core::models::RetrievalCandidate;
use lantern_retrieval::ranking::{dedup, RankingPipeline};
use lantern_retrieval::ContextAssembler;
use lantern_tokens::TokenCounter;

const WORDS: &[&str] = &[
    "refund", "policy", "enterprise", "customer", "shipping", "window", "contract", "support",
    "billing", "invoice", "account", "terms",
];

fn candidate_strategy() -> impl Strategy<Value = RetrievalCandidate> {
    (
        prop::collection::vec(prop::sample::select(WORDS), 3..12),
        0.0f32..1.0f32,
        0u8..4u8,
        0u32..20u32,
    )
        .prop_map(|(words, score, source, chunk_index)| {
            RetrievalCandidate::from_hit(
                format!("chunk-{source}-{chunk_index}"),
                format!("doc-{source}"),
                chunk_index,
                words.join(" "),
                score,
                chunk_index as usize,
            )
        })
}

fn candidates_strategy() -> impl Strategy<Value = Vec<RetrievalCandidate>> {
    prop::collection::vec(candidate_strategy(), 0..30).prop_map(|mut candidates| {
        for (rank, candidate) in candidates.iter_mut().enumerate() {
            candidate.original_rank = rank;
        }
        candidates
    })
}

fn keywords_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(WORDS).prop_map(str::to_string),
        0..3,
    )
}

proptest! {
    #[test]
    fn reranking_is_deterministic(
        candidates in candidates_strategy(),
        keywords in keywords_strategy(),
    ) {
        let pipeline = RankingPipeline::new(SearchConfig::default());
        let first: Vec<String> = pipeline
            .rank(candidates.clone(), &keywords)
            .into_iter()
            .map(|c| c.chunk_id)
            .collect();
        let second: Vec<String> = pipeline
            .rank(candidates, &keywords)
            .into_iter()
            .map(|c| c.chunk_id)
            .collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn no_two_survivors_are_near_duplicates(candidates in candidates_strategy()) {
        let threshold = SearchConfig::default().dedup_similarity;
        let survivors = dedup::collapse_near_duplicates(candidates, threshold);
        for (i, a) in survivors.iter().enumerate() {
            for b in survivors.iter().skip(i + 1) {
                prop_assert!(
                    dedup::text_similarity(&a.text, &b.text) <= threshold,
                    "{:?} vs {:?}",
                    a.text,
                    b.text
                );
            }
        }
    }

    #[test]
    fn per_source_cap_holds_pre_truncation(candidates in candidates_strategy()) {
        let capped = dedup::cap_per_source(candidates, 5);
        for source in capped.iter().map(|c| &c.source_document_id) {
            let count = capped
                .iter()
                .filter(|c| &c.source_document_id == source)
                .count();
            prop_assert!(count <= 5, "source {source} has {count} candidates");
        }
    }

    #[test]
    fn composite_never_drops_below_vector_score(
        candidates in candidates_strategy(),
        keywords in keywords_strategy(),
    ) {
        let pipeline = RankingPipeline::new(SearchConfig::default());
        for candidate in pipeline.rank(candidates, &keywords) {
            prop_assert!(candidate.composite_score >= candidate.vector_score - 1e-6);
            prop_assert!(candidate.keyword_bonus <= 0.30 + 1e-6);
        }
    }

    #[test]
    fn context_stays_within_budget(candidates in candidates_strategy()) {
        static COUNTER: OnceLock<Arc<TokenCounter>> = OnceLock::new();
        let counter = COUNTER.get_or_init(|| Arc::new(TokenCounter::default()));
        let assembler = ContextAssembler::new(counter.clone(), 40);
        let window = assembler.assemble(&candidates);
        prop_assert!(window.used_tokens() <= 40);
    }
}

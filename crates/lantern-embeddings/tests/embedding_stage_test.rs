//! Stage-level behavior: the fan-out/join, cache idempotence, keyword
//! degradation, and ledger accounting.

use std::sync::Arc;

use lantern_cache::{CacheLayer, MemoryCacheStore};
use lantern_core::config::{LanternConfig, QuotaConfig};
use lantern_embeddings::{EmbeddingStage, KeywordExtractor};
use lantern_ledger::InMemoryLedger;
use test_fixtures::{init_tracing, FakeCompletionProvider, FakeEmbeddingProvider};

struct Setup {
    embedding: Arc<FakeEmbeddingProvider>,
    completion: Arc<FakeCompletionProvider>,
    ledger: Arc<InMemoryLedger>,
    stage: EmbeddingStage,
}

fn setup(embedding: FakeEmbeddingProvider, completion: FakeCompletionProvider) -> Setup {
    init_tracing();
    let embedding = Arc::new(embedding);
    let completion = Arc::new(completion);
    let ledger = Arc::new(InMemoryLedger::new(QuotaConfig::default()));
    let config = LanternConfig::default();

    let cache = CacheLayer::new(Arc::new(MemoryCacheStore::default()), true);
    let keywords = KeywordExtractor::new(completion.clone(), &config);
    let stage = EmbeddingStage::new(
        embedding.clone(),
        keywords,
        cache,
        ledger.clone(),
        &config,
    );

    Setup {
        embedding,
        completion,
        ledger,
        stage,
    }
}

#[tokio::test]
async fn miss_then_hit_makes_one_provider_call() {
    let s = setup(
        FakeEmbeddingProvider::new(8),
        FakeCompletionProvider::new("refund, policy", &[]),
    );

    let first = s.stage.resolve("u1", "what is the refund window?").await.unwrap();
    let second = s.stage.resolve("u1", "what is the refund window?").await.unwrap();

    assert_eq!(s.embedding.call_count(), 1);
    assert_eq!(s.completion.complete_calls(), 1);
    assert_eq!(first.embedding, second.embedding);
    assert_eq!(first.keywords, second.keywords);
    // The cached resolution consumed nothing.
    assert!(second.usage.is_zero());
}

#[tokio::test]
async fn keywords_are_parsed_and_bounded() {
    let s = setup(
        FakeEmbeddingProvider::new(8),
        FakeCompletionProvider::new("Refund, Policy, Enterprise, Extra", &[]),
    );

    let prep = s.stage.resolve("u1", "refund policy question").await.unwrap();
    assert_eq!(prep.keywords, vec!["refund", "policy", "enterprise"]);
}

#[tokio::test]
async fn keyword_failure_degrades_to_empty_list() {
    let s = setup(
        FakeEmbeddingProvider::new(8),
        FakeCompletionProvider::new("unused", &[]).with_failing_complete(),
    );

    let prep = s.stage.resolve("u1", "refund policy question").await.unwrap();
    assert!(prep.keywords.is_empty());
    assert!(!prep.embedding.is_empty());
}

#[tokio::test]
async fn embedding_failure_fails_the_stage() {
    let s = setup(
        FakeEmbeddingProvider::failing(8),
        FakeCompletionProvider::new("refund", &[]),
    );

    let result = s.stage.resolve("u1", "refund policy question").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn actual_usage_lands_in_the_ledger() {
    let s = setup(
        FakeEmbeddingProvider::new(8),
        FakeCompletionProvider::new("refund", &[]),
    );

    s.stage.resolve("u1", "what is the refund window?").await.unwrap();

    use lantern_core::traits::LedgerStore;
    let snapshot = s.ledger.usage("u1").await.unwrap();
    // embed (7 prompt) + keyword call (15 + 5).
    assert_eq!(snapshot.daily_used, 27);
}

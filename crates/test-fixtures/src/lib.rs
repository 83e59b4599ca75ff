//! Counting and scripted fakes for every external collaborator trait,
//! shared by the integration tests across the workspace.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use lantern_core::errors::{CacheError, ProviderError};
use lantern_core::models::TokenUsage;
use lantern_core::traits::{
    CacheStore, CompletionChunk, CompletionProvider, CompletionRequest, CompletionResponse,
    CompletionStream, EmbeddingProvider, EmbeddingResponse, IndexHit, IndexSearchParams,
    VectorIndex,
};

static TRACING: Once = Once::new();

/// Install a fmt subscriber once, honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Build an index hit.
pub fn hit(chunk_id: &str, document_id: &str, chunk_index: u32, text: &str, score: f32) -> IndexHit {
    IndexHit {
        chunk_id: chunk_id.to_string(),
        source_document_id: document_id.to_string(),
        chunk_index,
        text: text.to_string(),
        score,
    }
}

// ============ Embedding provider ============

/// Deterministic embedding provider that counts its calls.
pub struct FakeEmbeddingProvider {
    dims: usize,
    calls: AtomicUsize,
    fail: bool,
}

impl FakeEmbeddingProvider {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// A provider whose every call fails with a terminal client error.
    pub fn failing(dims: usize) -> Self {
        Self {
            dims,
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Client {
                status: 401,
                reason: "invalid api key".into(),
            });
        }
        // Deterministic per input so cache tests can compare vectors.
        let seed = text.bytes().map(usize::from).sum::<usize>() as f32;
        let vector = (0..self.dims)
            .map(|i| ((seed + i as f32) % 97.0) / 97.0)
            .collect();
        Ok(EmbeddingResponse {
            vector,
            usage: TokenUsage::new(7, 0),
        })
    }

    fn name(&self) -> &str {
        "fake-embeddings"
    }
}

// ============ Completion provider ============

/// Scripted completion provider.
///
/// `complete` returns a fixed keyword reply; `stream` replays scripted
/// fragments, then a usage chunk, then closes. Failure modes cover the
/// keyword-degradation and mid-stream-interruption paths, and `stall`
/// holds the stream open after the first fragment for cancellation tests.
pub struct FakeCompletionProvider {
    keyword_reply: String,
    fragments: Vec<String>,
    usage: TokenUsage,
    fail_complete: bool,
    fail_mid_stream: bool,
    stall_after_first: bool,
    complete_calls: AtomicUsize,
    stream_calls: AtomicUsize,
}

impl FakeCompletionProvider {
    pub fn new(keyword_reply: &str, fragments: &[&str]) -> Self {
        Self {
            keyword_reply: keyword_reply.to_string(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            usage: TokenUsage::new(120, 40),
            fail_complete: false,
            fail_mid_stream: false,
            stall_after_first: false,
            complete_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
        }
    }

    /// Keyword extraction fails with a terminal client error.
    pub fn with_failing_complete(mut self) -> Self {
        self.fail_complete = true;
        self
    }

    /// The stream errors after the first fragment.
    pub fn with_mid_stream_failure(mut self) -> Self {
        self.fail_mid_stream = true;
        self
    }

    /// The stream stalls after the first fragment until dropped.
    pub fn with_stall_after_first(mut self) -> Self {
        self.stall_after_first = true;
        self
    }

    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletionProvider {
    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_complete {
            return Err(ProviderError::Client {
                status: 400,
                reason: "scripted keyword failure".into(),
            });
        }
        Ok(CompletionResponse {
            content: self.keyword_reply.clone(),
            usage: TokenUsage::new(15, 5),
        })
    }

    async fn stream(&self, _request: CompletionRequest) -> Result<CompletionStream, ProviderError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(16);
        let fragments = self.fragments.clone();
        let usage = self.usage;
        let fail_mid_stream = self.fail_mid_stream;
        let stall_after_first = self.stall_after_first;

        tokio::spawn(async move {
            for (i, fragment) in fragments.iter().enumerate() {
                if tx
                    .send(Ok(CompletionChunk {
                        delta: Some(fragment.clone()),
                        usage: None,
                    }))
                    .await
                    .is_err()
                {
                    return;
                }
                if i == 0 && fail_mid_stream {
                    let _ = tx
                        .send(Err(ProviderError::Server {
                            status: 502,
                            reason: "scripted mid-stream failure".into(),
                        }))
                        .await;
                    return;
                }
                if i == 0 && stall_after_first {
                    // Hold the stream open until the receiver goes away.
                    tx.closed().await;
                    return;
                }
            }
            let _ = tx
                .send(Ok(CompletionChunk {
                    delta: None,
                    usage: Some(usage),
                }))
                .await;
        });

        Ok(rx)
    }

    fn name(&self) -> &str {
        "fake-completions"
    }
}

// ============ Vector index ============

/// Scripted vector index that records every search's parameters.
pub struct FakeVectorIndex {
    responses: Mutex<VecDeque<Vec<IndexHit>>>,
    repeat_last: Option<Vec<IndexHit>>,
    calls: Mutex<Vec<IndexSearchParams>>,
}

impl FakeVectorIndex {
    /// Always answer with the same hits.
    pub fn with_hits(hits: Vec<IndexHit>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            repeat_last: Some(hits),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer each call with the next scripted response, then empty.
    pub fn with_sequence(responses: Vec<Vec<IndexHit>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            repeat_last: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_calls(&self) -> Vec<IndexSearchParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VectorIndex for FakeVectorIndex {
    async fn search(
        &self,
        _vector: &[f32],
        params: IndexSearchParams,
    ) -> Result<Vec<IndexHit>, lantern_core::errors::IndexError> {
        self.calls.lock().unwrap().push(params);
        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            return Ok(next);
        }
        Ok(self.repeat_last.clone().unwrap_or_default())
    }
}

// ============ Cache store ============

/// A cache whose backend is down; every call fails.
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable {
            reason: "connection refused".into(),
        })
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable {
            reason: "connection refused".into(),
        })
    }
}

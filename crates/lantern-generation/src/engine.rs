use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use lantern_cache::CacheLayer;
use lantern_core::config::LanternConfig;
use lantern_core::errors::{LanternError, LanternResult};
use lantern_core::models::{AnswerEvent, CompletedAnswer, Query, TokenUsage, UsageReport};
use lantern_core::traits::{
    CacheStore, CompletionProvider, CompletionRequest, EmbeddingProvider, LedgerStore,
    QuotaVerdict, VectorIndex,
};
use lantern_embeddings::{EmbeddingStage, KeywordExtractor};
use lantern_resilience::{retry, timed_provider, RetryPolicy};
use lantern_retrieval::{ContextAssembler, RankingPipeline, RetrievalEngine};
use lantern_tokens::TokenCounter;

use crate::phase::{Phase, PhaseTracker};
use crate::prompt;
use crate::stream::{answer_channel, AnswerStream, CancellationToken};

/// Buffered fragments between the generation task and the caller.
const STREAM_BUFFER: usize = 32;

/// The injected external collaborators.
pub struct Services {
    pub embedding: Arc<dyn EmbeddingProvider>,
    pub completion: Arc<dyn CompletionProvider>,
    pub index: Arc<dyn VectorIndex>,
    pub cache: Arc<dyn CacheStore>,
    pub ledger: Arc<dyn LedgerStore>,
}

/// The answer engine: the one operation exposed to the serving layer.
#[derive(Clone)]
pub struct AnswerEngine {
    inner: Arc<Inner>,
}

struct Inner {
    embeddings: EmbeddingStage,
    retrieval: RetrievalEngine,
    ranking: RankingPipeline,
    assembler: ContextAssembler,
    completion: Arc<dyn CompletionProvider>,
    ledger: Arc<dyn LedgerStore>,
    counter: Arc<TokenCounter>,
    policy: RetryPolicy,
    config: LanternConfig,
}

impl AnswerEngine {
    pub fn new(services: Services, config: LanternConfig) -> Self {
        let counter = Arc::new(TokenCounter::default());
        let cache = CacheLayer::new(services.cache, config.cache.enabled);

        let keywords = KeywordExtractor::new(services.completion.clone(), &config);
        let embeddings = EmbeddingStage::new(
            services.embedding,
            keywords,
            cache.clone(),
            services.ledger.clone(),
            &config,
        );
        let retrieval = RetrievalEngine::new(
            services.index,
            cache,
            config.search.clone(),
            RetryPolicy::index(&config.retry),
            config.retry.index_timeout_secs,
            Duration::from_secs(config.cache.retrieval_ttl_secs),
        );
        let ranking = RankingPipeline::new(config.search.clone());
        let assembler = ContextAssembler::new(counter.clone(), config.generation.context_token_budget);

        Self {
            inner: Arc::new(Inner {
                embeddings,
                retrieval,
                ranking,
                assembler,
                completion: services.completion,
                ledger: services.ledger,
                counter,
                policy: RetryPolicy::provider(&config.retry),
                config,
            }),
        }
    }

    /// Answer a question as a cancellable event stream.
    ///
    /// The stream yields zero or more fragments followed by exactly one
    /// terminal event, in every outcome including cancellation.
    pub fn stream_answer(&self, query: Query) -> AnswerStream {
        let (tx, stream) = answer_channel(STREAM_BUFFER);
        let cancel = stream.cancellation_token();
        let inner = self.inner.clone();

        tokio::spawn(async move {
            let mut phase = PhaseTracker::new();
            let outcome = inner.run(query, &tx, &cancel, &mut phase).await;
            let terminal = match outcome {
                Ok(answer) => {
                    phase.advance(Phase::Complete);
                    AnswerEvent::Completed(answer)
                }
                Err(error) => {
                    let kind = error.kind();
                    if matches!(error, LanternError::Cancelled) {
                        phase.advance(Phase::Cancelled);
                    } else {
                        phase.advance(Phase::Failed);
                        warn!(%error, "answer pipeline failed");
                    }
                    AnswerEvent::Failed {
                        kind,
                        message: error.to_string(),
                    }
                }
            };
            // The receiver may already be gone after a disconnect; the
            // terminal event is still produced for the contract.
            let _ = tx.send(terminal).await;
            debug!(phase = ?phase.current(), "answer pipeline finished");
        });

        stream
    }
}

impl Inner {
    async fn run(
        &self,
        query: Query,
        tx: &mpsc::Sender<AnswerEvent>,
        cancel: &CancellationToken,
        phase: &mut PhaseTracker,
    ) -> LanternResult<CompletedAnswer> {
        // Validation and quota gating reject before any external call.
        query.validate(self.config.generation.max_question_chars)?;
        let normalized = query.normalized_text();
        let max_tokens = query
            .max_tokens
            .unwrap_or(self.config.generation.default_max_tokens);
        let temperature = query
            .temperature
            .unwrap_or(self.config.generation.default_temperature);

        let estimate = self.estimate_cost(&query, max_tokens);
        match self.ledger.check(&query.identity, estimate).await {
            Ok(QuotaVerdict::Allowed) => {}
            Ok(QuotaVerdict::Denied { scope, used, limit }) => {
                return Err(LanternError::QuotaExceeded { scope, used, limit });
            }
            // Fail open: accounting trouble never blocks answering.
            Err(error) => warn!(%error, "quota check failed, allowing request"),
        }

        phase.advance(Phase::Retrieving);
        let prep = self.embeddings.resolve(&query.identity, &normalized).await?;
        let candidates = self
            .retrieval
            .retrieve(&prep.embedding, normalized.chars().count())
            .await?;
        let ranked = self.ranking.rank(candidates, &prep.keywords);

        phase.advance(Phase::ContextReady);
        let window = self.assembler.assemble(&ranked);
        if window.is_empty() {
            info!("no context fits, answering without citations");
        }

        phase.advance(Phase::Generating);
        let request = prompt::compose(&query, &window, temperature, max_tokens);
        let (completion_usage, generation) = self.generate(&request, tx, cancel).await;

        // Billing for consumed tokens completes before teardown on every
        // path, including cancellation and interruption.
        if !completion_usage.is_zero() {
            if let Err(error) = self.ledger.record(&query.identity, completion_usage).await {
                warn!(identity = %query.identity, %error, "ledger record failed");
            }
        }
        generation?;

        Ok(CompletedAnswer {
            sources: window.sources(),
            usage: UsageReport {
                embedding: prep.usage,
                completion: completion_usage,
            },
            conversation_id: query.conversation_id.unwrap_or_else(Uuid::new_v4),
        })
    }

    /// Worst-case token estimate for the quota gate: embedding prompt,
    /// completion prompt (history + context ceiling + question),
    /// completion output, and the keyword call.
    fn estimate_cost(&self, query: &Query, max_tokens: u32) -> u64 {
        let question = self.counter.count(&query.text) as u64;
        let history: u64 = query
            .history
            .iter()
            .map(|turn| self.counter.count(&turn.content) as u64)
            .sum();
        question * 2
            + history
            + self.config.generation.context_token_budget as u64
            + u64::from(max_tokens)
            + u64::from(self.config.generation.keyword_max_tokens)
    }

    /// Drive the streaming completion, forwarding fragments in arrival
    /// order. Returns the billable usage alongside the outcome so the
    /// caller can record it on every path.
    ///
    /// Establishing the stream is retried; a failure after the first
    /// byte is not (partial output has already been delivered).
    async fn generate(
        &self,
        request: &CompletionRequest,
        tx: &mpsc::Sender<AnswerEvent>,
        cancel: &CancellationToken,
    ) -> (TokenUsage, LanternResult<()>) {
        let timeout_secs = self.config.retry.provider_timeout_secs;

        let established = retry(&self.policy, "completion_stream", || {
            timed_provider(timeout_secs, self.completion.stream(request.clone()))
        })
        .await;
        let mut chunks = match established {
            Ok(chunks) => chunks,
            Err(error) => return (TokenUsage::default(), Err(error.into())),
        };

        let mut accumulated = String::new();
        let mut reported: Option<TokenUsage> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("cancellation requested, stopping forwarding");
                    let billed = self.billable(request, &accumulated, reported);
                    return (billed, Err(LanternError::Cancelled));
                }
                next = timeout(Duration::from_secs(timeout_secs), chunks.recv()) => match next {
                    Err(_) => {
                        let billed = self.billable(request, &accumulated, reported);
                        return (
                            billed,
                            Err(LanternError::StreamInterrupted {
                                reason: format!("no data from provider for {timeout_secs}s"),
                            }),
                        );
                    }
                    Ok(Some(Ok(chunk))) => {
                        if let Some(delta) = chunk.delta {
                            accumulated.push_str(&delta);
                            if tx
                                .send(AnswerEvent::Fragment { content: delta })
                                .await
                                .is_err()
                            {
                                // Receiver dropped: the client is gone.
                                let billed = self.billable(request, &accumulated, reported);
                                return (billed, Err(LanternError::Cancelled));
                            }
                        }
                        if let Some(usage) = chunk.usage {
                            reported = Some(usage);
                        }
                    }
                    Ok(Some(Err(error))) => {
                        // Partial output is already with the caller; a
                        // mid-stream failure is terminal, never retried.
                        let billed = self.billable(request, &accumulated, reported);
                        return (
                            billed,
                            Err(LanternError::StreamInterrupted {
                                reason: error.to_string(),
                            }),
                        );
                    }
                    Ok(None) => break,
                }
            }
        }

        let usage = reported.unwrap_or_else(|| {
            warn!("provider stream ended without a usage report, estimating");
            self.estimate_usage(request, &accumulated)
        });
        (usage, Ok(()))
    }

    /// Tokens consumed so far: the provider's report when it arrived,
    /// otherwise a tokenizer estimate over prompt + accumulated output.
    fn billable(
        &self,
        request: &CompletionRequest,
        accumulated: &str,
        reported: Option<TokenUsage>,
    ) -> TokenUsage {
        reported.unwrap_or_else(|| self.estimate_usage(request, accumulated))
    }

    fn estimate_usage(&self, request: &CompletionRequest, accumulated: &str) -> TokenUsage {
        TokenUsage::new(
            self.counter.count(&prompt::flatten(request)) as u32,
            self.counter.count(accumulated) as u32,
        )
    }
}

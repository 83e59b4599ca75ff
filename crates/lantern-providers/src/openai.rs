//! OpenAI-compatible model provider.
//!
//! One client implements both `EmbeddingProvider` and
//! `CompletionProvider`. Streaming completions request
//! `stream_options.include_usage` so the final SSE event carries the
//! billed token counts.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use lantern_core::errors::ProviderError;
use lantern_core::models::{Role, TokenUsage};
use lantern_core::traits::{
    CompletionChunk, CompletionProvider, CompletionRequest, CompletionResponse, CompletionStream,
    EmbeddingProvider, EmbeddingResponse,
};

/// Buffered SSE chunks between the decode task and the pipeline.
const STREAM_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub completion_model: String,
    pub embedding_model: String,
}

/// Client for an OpenAI-compatible API.
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Client {
                status: 401,
                reason: "api key is not configured".into(),
            });
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Connection {
                reason: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), &text))
    }

    fn chat_body(&self, request: &CompletionRequest, stream: bool) -> serde_json::Value {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system,
        })];
        for turn in &request.messages {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(serde_json::json!({ "role": role, "content": turn.content }));
        }
        let mut body = serde_json::json!({
            "model": self.config.completion_model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if stream {
            body["stream"] = serde_json::Value::Bool(true);
            body["stream_options"] = serde_json::json!({ "include_usage": true });
        }
        body
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse, ProviderError> {
        let body = serde_json::json!({
            "model": self.config.embedding_model,
            "input": [text],
        });
        let response = self.post_json("/embeddings", &body).await?;
        let json: serde_json::Value =
            response.json().await.map_err(|e| ProviderError::MalformedResponse {
                reason: e.to_string(),
            })?;
        let parsed = parse_embedding_response(&json)?;
        debug!(
            model = %self.config.embedding_model,
            dims = parsed.vector.len(),
            prompt_tokens = parsed.usage.prompt_tokens,
            "embedding generated"
        );
        Ok(parsed)
    }

    fn name(&self) -> &str {
        &self.config.embedding_model
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let body = self.chat_body(&request, false);
        let response = self.post_json("/chat/completions", &body).await?;
        let json: serde_json::Value =
            response.json().await.map_err(|e| ProviderError::MalformedResponse {
                reason: e.to_string(),
            })?;
        parse_chat_response(&json)
    }

    async fn stream(&self, request: CompletionRequest) -> Result<CompletionStream, ProviderError> {
        let body = self.chat_body(&request, true);
        let response = self.post_json("/chat/completions", &body).await?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let events = response.bytes_stream().eventsource();

        tokio::spawn(async move {
            tokio::pin!(events);
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if event.data == "[DONE]" {
                            break;
                        }
                        match parse_stream_event(&event.data) {
                            Ok(Some(chunk)) => {
                                if tx.send(Ok(chunk)).await.is_err() {
                                    // Receiver gone: the pipeline was
                                    // cancelled, stop pulling.
                                    return;
                                }
                            }
                            Ok(None) => {}
                            Err(error) => {
                                warn!(%error, "undecodable stream event, skipping");
                            }
                        }
                    }
                    Err(error) => {
                        let _ = tx
                            .send(Err(ProviderError::Connection {
                                reason: error.to_string(),
                            }))
                            .await;
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    fn name(&self) -> &str {
        &self.config.completion_model
    }
}

fn classify_transport(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout { secs: 0 }
    } else {
        ProviderError::Connection {
            reason: error.to_string(),
        }
    }
}

/// Map an HTTP status to a failure class: 429 is rate limiting, 5xx a
/// server fault, everything else a terminal client error.
fn classify_status(status: u16, body: &str) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited,
        500..=599 => ProviderError::Server {
            status,
            reason: body.to_string(),
        },
        _ => ProviderError::Client {
            status,
            reason: body.to_string(),
        },
    }
}

fn parse_usage(json: &serde_json::Value) -> Option<TokenUsage> {
    let usage = json.get("usage")?;
    if usage.is_null() {
        return None;
    }
    Some(TokenUsage::new(
        usage.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        usage
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
    ))
}

fn parse_embedding_response(json: &serde_json::Value) -> Result<EmbeddingResponse, ProviderError> {
    let embedding = json
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|d| d.first())
        .and_then(|item| item.get("embedding"))
        .and_then(|e| e.as_array())
        .ok_or_else(|| ProviderError::MalformedResponse {
            reason: "missing data[0].embedding".into(),
        })?;
    let vector: Vec<f32> = embedding
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect();
    Ok(EmbeddingResponse {
        vector,
        usage: parse_usage(json).unwrap_or_default(),
    })
}

fn parse_chat_response(json: &serde_json::Value) -> Result<CompletionResponse, ProviderError> {
    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| ProviderError::MalformedResponse {
            reason: "missing choices[0].message.content".into(),
        })?;
    Ok(CompletionResponse {
        content: content.to_string(),
        usage: parse_usage(json).unwrap_or_default(),
    })
}

/// Decode one SSE data payload into a chunk. Events with neither a
/// content delta nor usage (role prelude, keep-alives) map to `None`.
fn parse_stream_event(data: &str) -> Result<Option<CompletionChunk>, serde_json::Error> {
    let json: serde_json::Value = serde_json::from_str(data)?;
    let delta = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str())
        .map(|c| c.to_string());
    let usage = parse_usage(&json);
    if delta.is_none() && usage.is_none() {
        return Ok(None);
    }
    Ok(Some(CompletionChunk { delta, usage }))
}

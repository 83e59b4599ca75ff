//! Qdrant REST vector index adapter.

use async_trait::async_trait;
use tracing::debug;

use lantern_core::errors::IndexError;
use lantern_core::traits::{IndexHit, IndexSearchParams, VectorIndex};

#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// Service root, e.g. `http://localhost:6333`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

/// Vector index backed by a Qdrant collection over REST.
pub struct QdrantIndex {
    http: reqwest::Client,
    config: QdrantConfig,
}

impl QdrantIndex {
    pub fn new(config: QdrantConfig) -> Result<Self, IndexError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| IndexError::Connection {
                reason: e.to_string(),
            })?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(
        &self,
        vector: &[f32],
        params: IndexSearchParams,
    ) -> Result<Vec<IndexHit>, IndexError> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.config.base_url, self.config.collection
        );
        let body = serde_json::json!({
            "vector": vector,
            "limit": params.limit,
            "score_threshold": params.min_score,
            "params": { "hnsw_ef": params.ef_search },
            "with_payload": true,
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("api-key", api_key);
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // 5xx is transient for the index retry policy; anything else
            // is a malformed search.
            return Err(if status.is_server_error() {
                IndexError::Connection {
                    reason: format!("status {status}: {text}"),
                }
            } else {
                IndexError::SearchFailed {
                    reason: format!("status {status}: {text}"),
                }
            });
        }

        let json: serde_json::Value =
            response.json().await.map_err(|e| IndexError::SearchFailed {
                reason: e.to_string(),
            })?;
        let hits = parse_search_response(&json)?;
        debug!(
            collection = %self.config.collection,
            hits = hits.len(),
            limit = params.limit,
            min_score = params.min_score,
            ef_search = params.ef_search,
            "index search complete"
        );
        Ok(hits)
    }
}

fn classify_transport(error: reqwest::Error) -> IndexError {
    if error.is_timeout() {
        IndexError::Timeout { secs: 0 }
    } else {
        IndexError::Connection {
            reason: error.to_string(),
        }
    }
}

/// Extract hits from a Qdrant search response. Points with an empty
/// `text` payload are dropped.
fn parse_search_response(json: &serde_json::Value) -> Result<Vec<IndexHit>, IndexError> {
    let result = json
        .get("result")
        .and_then(|r| r.as_array())
        .ok_or_else(|| IndexError::SearchFailed {
            reason: "missing result array".into(),
        })?;

    let mut hits = Vec::with_capacity(result.len());
    for point in result {
        let payload = point.get("payload").cloned().unwrap_or_default();
        let text = payload
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        if text.is_empty() {
            continue;
        }
        hits.push(IndexHit {
            chunk_id: point
                .get("id")
                .map(|id| id.to_string().trim_matches('"').to_string())
                .unwrap_or_default(),
            source_document_id: payload
                .get("document_id")
                .and_then(|d| d.as_str())
                .unwrap_or("unknown")
                .to_string(),
            chunk_index: payload
                .get("chunk_index")
                .and_then(|c| c.as_u64())
                .unwrap_or(0) as u32,
            text,
            score: point.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0) as f32,
        });
    }
    Ok(hits)
}

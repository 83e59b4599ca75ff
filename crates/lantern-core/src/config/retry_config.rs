use serde::{Deserialize, Serialize};

use super::defaults;

/// A single retry profile: attempt cap and backoff window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryProfile {
    pub max_attempts: u32,
    pub min_wait_secs: u64,
    pub max_wait_secs: u64,
}

impl Default for RetryProfile {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_PROVIDER_MAX_ATTEMPTS,
            min_wait_secs: defaults::DEFAULT_PROVIDER_MIN_WAIT_SECS,
            max_wait_secs: defaults::DEFAULT_PROVIDER_MAX_WAIT_SECS,
        }
    }
}

/// Retry and timeout configuration for external calls.
///
/// Timeouts bound each individual call and are independent of the backoff
/// window; an elapsed timeout is itself a retryable failure class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Profile for embedding/completion provider calls.
    pub provider: RetryProfile,
    /// Profile for vector index calls.
    pub index: RetryProfile,
    /// Fraction of each delay added as random jitter.
    pub jitter_factor: f64,
    /// Hard timeout for a single provider call.
    pub provider_timeout_secs: u64,
    /// Hard timeout for a single index call.
    pub index_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            provider: RetryProfile::default(),
            index: RetryProfile {
                max_attempts: defaults::DEFAULT_INDEX_MAX_ATTEMPTS,
                min_wait_secs: defaults::DEFAULT_INDEX_MIN_WAIT_SECS,
                max_wait_secs: defaults::DEFAULT_INDEX_MAX_WAIT_SECS,
            },
            jitter_factor: defaults::DEFAULT_JITTER_FACTOR,
            provider_timeout_secs: defaults::DEFAULT_PROVIDER_TIMEOUT_SECS,
            index_timeout_secs: defaults::DEFAULT_INDEX_TIMEOUT_SECS,
        }
    }
}

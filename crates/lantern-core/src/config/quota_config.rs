use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-identity token quota limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    /// Daily token budget, reset at 00:00 UTC.
    pub daily_limit: u64,
    /// Monthly token budget, reset on the 1st.
    pub monthly_limit: u64,
    /// Ceiling on a single request's estimated cost.
    pub max_tokens_per_request: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_limit: defaults::DEFAULT_DAILY_TOKEN_LIMIT,
            monthly_limit: defaults::DEFAULT_MONTHLY_TOKEN_LIMIT,
            max_tokens_per_request: defaults::DEFAULT_MAX_TOKENS_PER_REQUEST,
        }
    }
}

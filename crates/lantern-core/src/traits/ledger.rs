use async_trait::async_trait;

use crate::errors::LedgerError;
use crate::models::TokenUsage;

/// Outcome of a quota check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaVerdict {
    /// Within limits, proceed.
    Allowed,
    /// Over a limit; block before any external call.
    Denied { scope: String, used: u64, limit: u64 },
}

/// Current usage against both windows, for reporting endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageSnapshot {
    pub daily_used: u64,
    pub daily_limit: u64,
    pub monthly_used: u64,
    pub monthly_limit: u64,
}

/// Per-identity rolling quota counters.
///
/// `check` is read before any token-consuming call with a worst-case
/// estimate; `record` is written after each call with the actual usage.
/// Implementations must tolerate concurrent increments for the same
/// identity without lost updates (per-key atomicity suffices).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn check(&self, identity: &str, estimated_tokens: u64)
        -> Result<QuotaVerdict, LedgerError>;

    async fn record(&self, identity: &str, usage: TokenUsage) -> Result<(), LedgerError>;

    async fn usage(&self, identity: &str) -> Result<UsageSnapshot, LedgerError>;
}

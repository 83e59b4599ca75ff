use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use dashmap::DashMap;
use tracing::debug;

use lantern_core::config::QuotaConfig;
use lantern_core::errors::LedgerError;
use lantern_core::models::TokenUsage;
use lantern_core::traits::{LedgerStore, QuotaVerdict, UsageSnapshot};

/// Rolling counters for one identity.
#[derive(Debug, Clone, Copy)]
struct Windows {
    day: NaiveDate,
    daily_used: u64,
    month: (i32, u32),
    monthly_used: u64,
}

impl Windows {
    fn open(now: DateTime<Utc>) -> Self {
        Self {
            day: now.date_naive(),
            daily_used: 0,
            month: (now.year(), now.month()),
            monthly_used: 0,
        }
    }

    /// Reset any window whose calendar boundary has passed.
    fn roll(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if self.day != today {
            self.day = today;
            self.daily_used = 0;
        }
        let month = (now.year(), now.month());
        if self.month != month {
            self.month = month;
            self.monthly_used = 0;
        }
    }
}

/// In-process `LedgerStore` backed by a dashmap.
pub struct InMemoryLedger {
    entries: DashMap<String, Windows>,
    config: QuotaConfig,
}

impl InMemoryLedger {
    pub fn new(config: QuotaConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    /// Quota check at an explicit instant (separated so window rollover
    /// is testable without waiting for midnight).
    pub fn check_at(
        &self,
        identity: &str,
        estimated_tokens: u64,
        now: DateTime<Utc>,
    ) -> QuotaVerdict {
        if estimated_tokens > self.config.max_tokens_per_request {
            return QuotaVerdict::Denied {
                scope: "request".to_string(),
                used: estimated_tokens,
                limit: self.config.max_tokens_per_request,
            };
        }

        let mut entry = self
            .entries
            .entry(identity.to_string())
            .or_insert_with(|| Windows::open(now));
        entry.roll(now);

        if entry.daily_used + estimated_tokens > self.config.daily_limit {
            return QuotaVerdict::Denied {
                scope: "daily".to_string(),
                used: entry.daily_used,
                limit: self.config.daily_limit,
            };
        }
        if entry.monthly_used + estimated_tokens > self.config.monthly_limit {
            return QuotaVerdict::Denied {
                scope: "monthly".to_string(),
                used: entry.monthly_used,
                limit: self.config.monthly_limit,
            };
        }
        QuotaVerdict::Allowed
    }

    /// Record actual usage at an explicit instant.
    pub fn record_at(&self, identity: &str, usage: TokenUsage, now: DateTime<Utc>) {
        if usage.is_zero() {
            return;
        }
        let mut entry = self
            .entries
            .entry(identity.to_string())
            .or_insert_with(|| Windows::open(now));
        entry.roll(now);
        entry.daily_used += u64::from(usage.total());
        entry.monthly_used += u64::from(usage.total());
        debug!(
            identity,
            prompt = usage.prompt_tokens,
            completion = usage.completion_tokens,
            daily_used = entry.daily_used,
            monthly_used = entry.monthly_used,
            "recorded token usage"
        );
    }

    pub fn usage_at(&self, identity: &str, now: DateTime<Utc>) -> UsageSnapshot {
        let mut entry = self
            .entries
            .entry(identity.to_string())
            .or_insert_with(|| Windows::open(now));
        entry.roll(now);
        UsageSnapshot {
            daily_used: entry.daily_used,
            daily_limit: self.config.daily_limit,
            monthly_used: entry.monthly_used,
            monthly_limit: self.config.monthly_limit,
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn check(
        &self,
        identity: &str,
        estimated_tokens: u64,
    ) -> Result<QuotaVerdict, LedgerError> {
        Ok(self.check_at(identity, estimated_tokens, Utc::now()))
    }

    async fn record(&self, identity: &str, usage: TokenUsage) -> Result<(), LedgerError> {
        self.record_at(identity, usage, Utc::now());
        Ok(())
    }

    async fn usage(&self, identity: &str) -> Result<UsageSnapshot, LedgerError> {
        Ok(self.usage_at(identity, Utc::now()))
    }
}

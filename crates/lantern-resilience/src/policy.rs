use std::time::Duration;

use rand::Rng;

use lantern_core::config::{RetryConfig, RetryProfile};
use lantern_core::errors::FailureClass;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then try again.
    Retry(Duration),
    /// Surface the error to the call site.
    GiveUp,
}

/// A retry policy: attempt cap plus a jittered exponential backoff window.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
    pub jitter_factor: f64,
}

impl RetryPolicy {
    pub fn from_profile(profile: &RetryProfile, jitter_factor: f64) -> Self {
        Self {
            max_attempts: profile.max_attempts,
            min_wait: Duration::from_secs(profile.min_wait_secs),
            max_wait: Duration::from_secs(profile.max_wait_secs),
            jitter_factor,
        }
    }

    /// Policy for embedding/completion provider calls.
    pub fn provider(config: &RetryConfig) -> Self {
        Self::from_profile(&config.provider, config.jitter_factor)
    }

    /// Policy for vector index calls.
    pub fn index(config: &RetryConfig) -> Self {
        Self::from_profile(&config.index, config.jitter_factor)
    }

    /// Decide the fate of a failed attempt (`attempt` is 1-based).
    pub fn decide(&self, attempt: u32, class: FailureClass) -> RetryDecision {
        if !retryable(class) || attempt >= self.max_attempts {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry(self.delay_for(attempt))
    }

    /// Exponential backoff with jitter: `min * 2^(attempt-1)`, capped at
    /// `max`, plus up to `jitter_factor` of the base as random jitter.
    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let base = self
            .min_wait
            .saturating_mul(1u32 << exp)
            .min(self.max_wait);
        let jitter = rand::thread_rng().gen_range(0.0..=self.jitter_factor);
        base + base.mul_f64(jitter)
    }
}

/// Rate limits, connection failures, timeouts, and server errors are
/// transient; client errors never retry.
fn retryable(class: FailureClass) -> bool {
    match class {
        FailureClass::RateLimited
        | FailureClass::Connection
        | FailureClass::Timeout
        | FailureClass::Server => true,
        FailureClass::Client => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            min_wait: Duration::from_secs(2),
            max_wait: Duration::from_secs(60),
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn client_errors_never_retry() {
        let p = policy(3);
        assert_eq!(p.decide(1, FailureClass::Client), RetryDecision::GiveUp);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let p = policy(3);
        assert!(matches!(
            p.decide(2, FailureClass::Timeout),
            RetryDecision::Retry(_)
        ));
        assert_eq!(p.decide(3, FailureClass::Timeout), RetryDecision::GiveUp);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let p = policy(10);
        let delays: Vec<Duration> = (1..=6)
            .map(|attempt| match p.decide(attempt, FailureClass::Server) {
                RetryDecision::Retry(d) => d,
                RetryDecision::GiveUp => panic!("expected retry"),
            })
            .collect();
        assert_eq!(delays[0], Duration::from_secs(2));
        assert_eq!(delays[1], Duration::from_secs(4));
        assert_eq!(delays[2], Duration::from_secs(8));
        assert_eq!(delays[4], Duration::from_secs(32));
        // 2 * 2^5 = 64 caps at 60.
        assert_eq!(delays[5], Duration::from_secs(60));
    }

    #[test]
    fn jitter_stays_within_factor() {
        let p = RetryPolicy {
            jitter_factor: 0.25,
            ..policy(5)
        };
        for _ in 0..100 {
            match p.decide(1, FailureClass::RateLimited) {
                RetryDecision::Retry(d) => {
                    assert!(d >= Duration::from_secs(2));
                    assert!(d <= Duration::from_secs(2).mul_f64(1.25));
                }
                RetryDecision::GiveUp => panic!("expected retry"),
            }
        }
    }

    #[test]
    fn index_profile_has_wider_attempt_cap() {
        let config = lantern_core::config::RetryConfig::default();
        let provider = RetryPolicy::provider(&config);
        let index = RetryPolicy::index(&config);
        assert_eq!(provider.max_attempts, 3);
        assert_eq!(index.max_attempts, 5);
        assert_eq!(index.min_wait, Duration::from_secs(1));
        assert_eq!(index.max_wait, Duration::from_secs(30));
    }
}

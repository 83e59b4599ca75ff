//! Token counting for budget estimation and billing fallbacks.
//!
//! Wraps the cl100k tokenizer with a content-hash cache so repeated
//! counts of the same chunk text (hot in the rerank/assembly path) are
//! amortized to a hash lookup.

use moka::sync::Cache;
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Default number of cached counts.
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Counts tokens the way the billing side does.
pub struct TokenCounter {
    bpe: CoreBPE,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Build a counter with the given cache capacity.
    pub fn with_capacity(capacity: u64) -> Self {
        // The cl100k table ships inside the tiktoken-rs crate; loading it
        // cannot fail at runtime.
        let bpe = cl100k_base().expect("embedded cl100k tokenizer data");
        Self {
            bpe,
            cache: Cache::new(capacity),
        }
    }

    /// Count tokens without touching the cache.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    /// Count tokens through the blake3-keyed cache.
    pub fn count_cached(&self, text: &str) -> usize {
        let key = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(count) = self.cache.get(&key) {
            return count;
        }
        let count = self.count(text);
        self.cache.insert(key, count);
        count
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_stable() {
        let counter = TokenCounter::default();
        let a = counter.count("What is our refund policy for enterprise customers?");
        let b = counter.count("What is our refund policy for enterprise customers?");
        assert_eq!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn empty_text_is_zero() {
        let counter = TokenCounter::default();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn cached_path_matches_direct_path() {
        let counter = TokenCounter::default();
        let text = "greedy context assembly under a fixed token ceiling";
        assert_eq!(counter.count_cached(text), counter.count(text));
        // Second lookup hits the cache and must agree.
        assert_eq!(counter.count_cached(text), counter.count(text));
    }
}

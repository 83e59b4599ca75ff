//! Deployment configuration.
//!
//! Every sub-config is serde-defaulted so a partial TOML file (or none at
//! all) yields a working setup. Defaults live in [`defaults`].

mod cache_config;
pub mod defaults;
mod generation_config;
mod quota_config;
mod retry_config;
mod search_config;

pub use cache_config::CacheConfig;
pub use generation_config::GenerationConfig;
pub use quota_config::QuotaConfig;
pub use retry_config::{RetryConfig, RetryProfile};
pub use search_config::SearchConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the answer engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanternConfig {
    pub search: SearchConfig,
    pub generation: GenerationConfig,
    pub cache: CacheConfig,
    pub quota: QuotaConfig,
    pub retry: RetryConfig,
}

impl LanternConfig {
    /// Parse a TOML document; missing sections and fields fall back to
    /// the defaults.
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = LanternConfig::from_toml("").unwrap();
        assert_eq!(cfg.search.normal_query_limit, 10);
        assert_eq!(cfg.generation.context_token_budget, 2_500);
        assert_eq!(cfg.quota.daily_limit, 100_000);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg = LanternConfig::from_toml(
            r#"
            [search]
            normal_query_limit = 25

            [quota]
            daily_limit = 5000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.search.normal_query_limit, 25);
        assert_eq!(cfg.search.short_query_limit, 20);
        assert_eq!(cfg.quota.daily_limit, 5_000);
        assert_eq!(cfg.quota.monthly_limit, 2_000_000);
    }
}

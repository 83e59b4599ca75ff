use lantern_core::config::SearchConfig;
use lantern_core::traits::IndexSearchParams;

/// Choose search parameters from the normalized question length.
///
/// Short questions carry little signal, so they get a wide-recall
/// profile; everything else uses the normal profile. The HNSW
/// recall/latency parameter is the same for both.
pub fn profile_for(normalized_chars: usize, config: &SearchConfig) -> IndexSearchParams {
    if normalized_chars <= config.short_query_max_chars {
        IndexSearchParams {
            limit: config.short_query_limit,
            min_score: config.short_query_min_score,
            ef_search: config.ef_search,
        }
    } else {
        IndexSearchParams {
            limit: config.normal_query_limit,
            min_score: config.normal_query_min_score,
            ef_search: config.ef_search,
        }
    }
}

/// The single fallback: threshold lowered to the floor, same limit.
pub fn fallback_params(params: IndexSearchParams, config: &SearchConfig) -> IndexSearchParams {
    IndexSearchParams {
        min_score: config.fallback_min_score,
        ..params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_question_uses_wide_profile() {
        let config = SearchConfig::default();
        // "AI" is 2 characters.
        let params = profile_for(2, &config);
        assert_eq!(params.limit, 20);
        assert!((params.min_score - 0.3).abs() < f32::EPSILON);
        assert_eq!(params.ef_search, 128);
    }

    #[test]
    fn boundary_is_inclusive() {
        let config = SearchConfig::default();
        assert_eq!(profile_for(6, &config).limit, 20);
        assert_eq!(profile_for(7, &config).limit, 10);
    }

    #[test]
    fn normal_question_uses_normal_profile() {
        let config = SearchConfig::default();
        let params = profile_for(51, &config);
        assert_eq!(params.limit, 10);
        assert!((params.min_score - 0.5).abs() < f32::EPSILON);
        assert_eq!(params.ef_search, 128);
    }

    #[test]
    fn fallback_lowers_threshold_keeps_limit() {
        let config = SearchConfig::default();
        let primary = profile_for(51, &config);
        let fallback = fallback_params(primary, &config);
        assert_eq!(fallback.limit, primary.limit);
        assert!((fallback.min_score - 0.2).abs() < f32::EPSILON);
        assert_eq!(fallback.ef_search, 128);
    }
}

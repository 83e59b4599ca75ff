/// Errors from the cache store.
///
/// Never fatal: every call site absorbs these into a cache miss (get) or
/// a no-op (set) and logs at warn, degrading to no-cache mode.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("cache serialization failed: {reason}")]
    Serialization { reason: String },
}

//! Cache layer: typed TTL caching over an injected store, degrading to
//! pass-through when the backend is unavailable.

mod keys;
mod layer;
mod store;

pub use keys::{embedding_key, retrieval_key};
pub use layer::CacheLayer;
pub use store::MemoryCacheStore;

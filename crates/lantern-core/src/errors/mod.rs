//! Error types for every subsystem, plus the crate-wide umbrella.

mod cache_error;
mod index_error;
mod ledger_error;
mod provider_error;

pub use cache_error::CacheError;
pub use index_error::IndexError;
pub use ledger_error::LedgerError;
pub use provider_error::{FailureClass, ProviderError};

/// Convenience alias used across the workspace.
pub type LanternResult<T> = Result<T, LanternError>;

/// Umbrella error for the answer pipeline.
#[derive(Debug, thiserror::Error)]
pub enum LanternError {
    #[error("malformed query: {reason}")]
    MalformedQuery { reason: String },

    #[error("quota exceeded for {scope}: used {used}/{limit}")]
    QuotaExceeded {
        scope: String,
        used: u64,
        limit: u64,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("stream interrupted: {reason}")]
    StreamInterrupted { reason: String },

    #[error("generation cancelled by the caller")]
    Cancelled,
}

/// Wire-level error taxonomy carried by terminal stream events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedQuery,
    QuotaExceeded,
    ProviderUnavailable,
    StreamInterrupted,
    Cancelled,
    Internal,
}

impl LanternError {
    /// Map an internal error onto the terminal-event taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LanternError::MalformedQuery { .. } => ErrorKind::MalformedQuery,
            LanternError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            LanternError::Provider(_) => ErrorKind::ProviderUnavailable,
            // ProviderUnavailable is reserved for the model providers; an
            // exhausted index surfaces as an internal failure.
            LanternError::Index(_) => ErrorKind::Internal,
            LanternError::StreamInterrupted { .. } => ErrorKind::StreamInterrupted,
            LanternError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mapping_covers_taxonomy() {
        let e = LanternError::MalformedQuery {
            reason: "empty".into(),
        };
        assert_eq!(e.kind(), ErrorKind::MalformedQuery);

        let e = LanternError::QuotaExceeded {
            scope: "daily".into(),
            used: 100_000,
            limit: 100_000,
        };
        assert_eq!(e.kind(), ErrorKind::QuotaExceeded);

        let e = LanternError::Provider(ProviderError::Unavailable {
            provider: "embeddings".into(),
        });
        assert_eq!(e.kind(), ErrorKind::ProviderUnavailable);

        let e = LanternError::Index(IndexError::Unavailable {
            reason: "connect refused".into(),
        });
        assert_eq!(e.kind(), ErrorKind::Internal);

        assert_eq!(LanternError::Cancelled.kind(), ErrorKind::Cancelled);
    }
}

use super::FailureClass;

/// Errors from the vector index service.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index connection error: {reason}")]
    Connection { reason: String },

    #[error("index call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("index unavailable after retries: {reason}")]
    Unavailable { reason: String },
}

impl IndexError {
    /// Classify for the index retry policy: connection trouble and
    /// timeouts are transient, a well-formed search rejection is not.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            IndexError::Connection { .. } => FailureClass::Connection,
            IndexError::Timeout { .. } => FailureClass::Timeout,
            IndexError::SearchFailed { .. } | IndexError::Unavailable { .. } => {
                FailureClass::Client
            }
        }
    }
}

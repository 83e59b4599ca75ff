/// Failure classes the retry policies decide on.
///
/// Derived from a [`ProviderError`] or [`super::IndexError`] at the call
/// site; the policy itself never inspects the underlying error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    RateLimited,
    Connection,
    Timeout,
    Server,
    Client,
}

/// Errors from the embedding and completion providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("rate limited by provider")]
    RateLimited,

    #[error("connection error: {reason}")]
    Connection { reason: String },

    #[error("provider call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("provider server error {status}: {reason}")]
    Server { status: u16, reason: String },

    #[error("provider client error {status}: {reason}")]
    Client { status: u16, reason: String },

    #[error("malformed provider response: {reason}")]
    MalformedResponse { reason: String },

    #[error("provider {provider} unavailable after retries")]
    Unavailable { provider: String },
}

impl ProviderError {
    /// Classify for the retry policy. Rate limits, connection failures,
    /// timeouts, and 5xx responses are transient; everything else is a
    /// terminal client-side failure.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            ProviderError::RateLimited => FailureClass::RateLimited,
            ProviderError::Connection { .. } => FailureClass::Connection,
            ProviderError::Timeout { .. } => FailureClass::Timeout,
            ProviderError::Server { .. } => FailureClass::Server,
            ProviderError::Client { .. }
            | ProviderError::MalformedResponse { .. }
            | ProviderError::Unavailable { .. } => FailureClass::Client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classes() {
        assert_eq!(
            ProviderError::RateLimited.failure_class(),
            FailureClass::RateLimited
        );
        assert_eq!(
            ProviderError::Timeout { secs: 30 }.failure_class(),
            FailureClass::Timeout
        );
        assert_eq!(
            ProviderError::Server {
                status: 503,
                reason: "overloaded".into()
            }
            .failure_class(),
            FailureClass::Server
        );
    }

    #[test]
    fn client_errors_are_terminal() {
        assert_eq!(
            ProviderError::Client {
                status: 401,
                reason: "bad key".into()
            }
            .failure_class(),
            FailureClass::Client
        );
    }
}

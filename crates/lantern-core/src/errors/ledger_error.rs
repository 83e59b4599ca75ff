/// Errors from the ledger store.
///
/// The pipeline fails open on these: a ledger that cannot be read or
/// written never blocks a request (availability over strict accounting).
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger store unavailable: {reason}")]
    Unavailable { reason: String },
}

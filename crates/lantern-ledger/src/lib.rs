//! Per-identity token usage ledger.
//!
//! Daily and monthly windows are independent and reset at fixed calendar
//! boundaries (00:00 UTC, the 1st). Counters roll over lazily on access;
//! per-identity atomicity comes from dashmap entry locking, so concurrent
//! increments for the same identity never lose updates and unrelated
//! identities never contend.

mod ledger;

pub use ledger::InMemoryLedger;

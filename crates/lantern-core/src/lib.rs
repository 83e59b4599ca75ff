//! # lantern-core
//!
//! Foundation crate for the Lantern answer engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::LanternConfig;
pub use errors::{ErrorKind, LanternError, LanternResult};
pub use models::{
    AnswerEvent, CompletedAnswer, ContextWindow, Query, RetrievalCandidate, Role, SourceRef,
    TokenUsage, Turn, UsageReport,
};

//! Error types for tracelog
//!
//! Failures fall into two groups:
//!
//! | Variant | Cause | Effect |
//! |---------|-------|--------|
//! | `NoTargetSection` | function call started with nothing to attach to | event aborted |
//! | `MalformedTrace` | last entry cannot hold a section | event aborted |
//! | `NestedSection` | nested function call under the `Reject` policy | event aborted |
//! | `InvariantViolation` | tool-output prompt without the QA system prompt | event aborted |
//! | `Io` / `Serialization` | persistence failed | event aborted |
//!
//! Parsing misses and unrecognised events are not errors; they are logged
//! as warnings and produce null fields or no entry at all.

use thiserror::Error;

/// Result type alias for tracelog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tracelog
#[derive(Debug, Error)]
pub enum Error {
    /// A function call started but the active level holds no entry to attach it to
    #[error("no target section available to append new content")]
    NoTargetSection,

    /// The trace is in a state the requested mutation cannot handle
    #[error("malformed trace state: {0}")]
    MalformedTrace(String),

    /// A function call started while another one is open and nesting is rejected
    #[error("function call started while {depth} section(s) already open")]
    NestedSection {
        /// Number of sections open when the start arrived
        depth: usize,
    },

    /// A hard precondition on the event payload did not hold
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// I/O error while persisting the trace
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The trace could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

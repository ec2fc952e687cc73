//! Unified error types for tracelog.
//!
//! This module provides a clean error type that wraps the errors of the
//! workspace crates and presents a consistent interface to callers.

use thiserror::Error;

/// All tracelog errors.
///
/// Every error aborts logging of the event that caused it. What has
/// already been persisted stays on disk untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Function call started with no entry at the active level to attach to
    #[error("no target section: {0}")]
    NoTargetSection(String),

    /// Trace state cannot take the requested mutation
    #[error("malformed trace state: {0}")]
    MalformedTrace(String),

    /// Nested function call rejected by the nesting policy
    #[error("nested function call rejected: {depth} section(s) already open")]
    NestedSection {
        /// Sections open when the start arrived
        depth: usize,
    },

    /// Event payload broke a hard precondition
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for tracelog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error comes from the shape of the trace.
    ///
    /// These are raised by the nested-log mutation engine and mean the event
    /// arrived at a point where the trace cannot accept it.
    pub fn is_malformed_state(&self) -> bool {
        matches!(
            self,
            Error::NoTargetSection(_) | Error::MalformedTrace(_) | Error::NestedSection { .. }
        )
    }

    /// Check if this is a violated payload precondition.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::InvariantViolation(_))
    }

    /// Check if persisting the trace failed.
    ///
    /// The in-memory trace already holds the event; the next successful
    /// persist writes it out.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Serialization(_))
    }
}

// Convert from internal core errors
impl From<tracelog_core::Error> for Error {
    fn from(e: tracelog_core::Error) -> Self {
        use tracelog_core::Error as CoreError;
        match e {
            CoreError::NoTargetSection => Error::NoTargetSection(
                "function call started with nothing to append to".to_string(),
            ),
            CoreError::MalformedTrace(msg) => Error::MalformedTrace(msg),
            CoreError::NestedSection { depth } => Error::NestedSection { depth },
            CoreError::InvariantViolation(msg) => Error::InvariantViolation(msg),
            CoreError::Io(io_err) => Error::Io(io_err),
            CoreError::Serialization(msg) => Error::Serialization(msg),
        }
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

//! Core types for tracelog
//!
//! This crate defines the fundamental types shared by every layer:
//! - [`EventKind`], [`EventPhase`], [`Payload`]: the inbound event model
//! - [`LogEntry`]: one ordered record in the trace
//! - [`PromptMarkers`]: the marker strings used to recognise prompt kinds
//! - [`parse_message_content`]: the refine-prompt parser
//! - [`PromptKind`], [`ResponseKind`]: classification of LLM messages
//!
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod error;
pub mod event;
pub mod markers;
pub mod parse;
pub mod prompt;

// Re-export commonly used types
pub use entry::{LogEntry, ADDITIONAL_CONTENT_KEY, FUNCTION_CALL_KEY, SUBJECTIVE_GRADE_KEY};
pub use error::{Error, Result};
pub use event::{ChatMessage, ChatResponse, EventKind, EventPhase, MessageRole, Payload};
pub use markers::PromptMarkers;
pub use parse::{parse_message_content, RefineContext};
pub use prompt::{PromptKind, ResponseKind};

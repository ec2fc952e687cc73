//! # tracelog
//!
//! Nested, incrementally persisted reasoning-trace logger for LLM agents.
//!
//! An agent running a "thought -> tool call -> observation -> answer" loop
//! reports each step as a start and an end notification. tracelog turns
//! that stream into a nested JSON trace and rewrites the whole trace to
//! disk after every change, so the file is always a complete snapshot of
//! the run so far.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tracelog::prelude::*;
//!
//! let mut handler = JsonLoggingHandler::builder()
//!     .log_root("./logs")
//!     .build()?;
//!
//! let payload = Payload::llm_start(messages, json!({"model": "gpt-4"}));
//! handler.on_event_start(EventKind::Llm, Some(&payload), "evt-1", "root")?;
//! ```
//!
//! ## Trace Shape
//!
//! Entries logged while a tool runs are collected in a function-call
//! section attached to the entry that preceded the call:
//!
//! ```json
//! [
//!     {
//!         "event_type": "LLM start",
//!         "user_raw_input": "What is MEV?",
//!         "additional_content": [
//!             {"function_call": [{"event_type": "TEMPLATING start"}]}
//!         ]
//!     },
//!     {"event_type": "FUNCTION_CALL end", "tool_output": "..."}
//! ]
//! ```
//!
//! ## Crates
//!
//! - `tracelog-core` - event model, entries, prompt classification
//! - `tracelog-engine` - the in-memory trace and its cursor
//! - `tracelog-durability` - trace files

#![warn(missing_docs)]

mod classify;
mod config;
mod error;
mod handler;

pub mod prelude;

// Re-export main entry points
pub use config::{LoggerConfig, TraceLoggerBuilder, DEFAULT_LOG_ROOT};
pub use error::{Error, Result};
pub use handler::JsonLoggingHandler;

// Re-export workspace types
pub use tracelog_core::{
    parse_message_content, ChatMessage, ChatResponse, EventKind, EventPhase, LogEntry,
    MessageRole, Payload, PromptKind, PromptMarkers, RefineContext, ResponseKind,
};
pub use tracelog_durability::{read_trace, JsonFileSink, MemorySink, TraceSink, WriteMode};
pub use tracelog_engine::{Cursor, NestingPolicy, TraceStore};

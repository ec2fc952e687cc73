//! Convenient imports for tracelog.
//!
//! ```ignore
//! use tracelog::prelude::*;
//!
//! let mut handler = JsonLoggingHandler::open("./logs")?;
//! ```

// Main entry point
pub use crate::config::{LoggerConfig, TraceLoggerBuilder};
pub use crate::handler::JsonLoggingHandler;

// Error handling
pub use crate::error::{Error, Result};

// Event model
pub use tracelog_core::{ChatMessage, EventKind, EventPhase, MessageRole, Payload};

// Behaviour knobs
pub use tracelog_core::PromptMarkers;
pub use tracelog_durability::WriteMode;
pub use tracelog_engine::NestingPolicy;

// Sinks
pub use tracelog_durability::{JsonFileSink, MemorySink, TraceSink};

// Re-export serde_json for convenience
pub use serde_json::json;

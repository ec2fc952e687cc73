//! Logger configuration.
//!
//! A [`LoggerConfig`] can be built in code through [`TraceLoggerBuilder`]
//! or loaded from a JSON file. Every field has a default, so a file only
//! needs the fields it changes:
//!
//! ```json
//! {
//!     "log_root": "/var/log/chatbot",
//!     "write_mode": "atomic",
//!     "event_starts_to_ignore": ["embedding", "chunking"],
//!     "markers": { "router_marker": "<ROUTER>" }
//! }
//! ```

use crate::error::{Error, Result};
use crate::handler::JsonLoggingHandler;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracelog_core::{EventKind, PromptMarkers};
use tracelog_durability::{JsonFileSink, TraceSink, WriteMode};
use tracelog_engine::NestingPolicy;

/// Default directory under which `json/` trace files are written
pub const DEFAULT_LOG_ROOT: &str = "logs";

/// Configuration of a [`JsonLoggingHandler`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory holding the `json/` subdirectory
    pub log_root: PathBuf,
    /// How each snapshot replaces the file
    pub write_mode: WriteMode,
    /// What a nested function call does
    pub nesting: NestingPolicy,
    /// Prompt marker strings
    pub markers: PromptMarkers,
    /// Start notifications dropped before classification
    pub event_starts_to_ignore: Vec<EventKind>,
    /// End notifications dropped before classification
    pub event_ends_to_ignore: Vec<EventKind>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_root: PathBuf::from(DEFAULT_LOG_ROOT),
            write_mode: WriteMode::default(),
            nesting: NestingPolicy::default(),
            markers: PromptMarkers::default(),
            event_starts_to_ignore: Vec::new(),
            event_ends_to_ignore: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Builder for [`JsonLoggingHandler`].
///
/// # Example
///
/// ```ignore
/// use tracelog::prelude::*;
///
/// let mut handler = JsonLoggingHandler::builder()
///     .log_root("./logs")
///     .atomic()
///     .ignore_start(EventKind::Embedding)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TraceLoggerBuilder {
    config: LoggerConfig,
}

impl TraceLoggerBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the log root directory.
    pub fn log_root(mut self, path: impl AsRef<Path>) -> Self {
        self.config.log_root = path.as_ref().to_path_buf();
        self
    }

    /// Set the write mode.
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    /// Write snapshots through a temp file and rename.
    pub fn atomic(self) -> Self {
        self.write_mode(WriteMode::Atomic)
    }

    /// Set the nesting policy.
    pub fn nesting(mut self, policy: NestingPolicy) -> Self {
        self.config.nesting = policy;
        self
    }

    /// Replace all prompt markers.
    pub fn markers(mut self, markers: PromptMarkers) -> Self {
        self.config.markers = markers;
        self
    }

    /// Replace only the router marker.
    pub fn router_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.markers.router_marker = marker.into();
        self
    }

    /// Drop start notifications of this kind.
    pub fn ignore_start(mut self, kind: EventKind) -> Self {
        self.config.event_starts_to_ignore.push(kind);
        self
    }

    /// Drop end notifications of this kind.
    pub fn ignore_end(mut self, kind: EventKind) -> Self {
        self.config.event_ends_to_ignore.push(kind);
        self
    }

    /// The configuration built so far.
    pub fn as_config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Create the run's trace file and the handler writing to it.
    pub fn build(self) -> Result<JsonLoggingHandler<JsonFileSink>> {
        let sink = JsonFileSink::create(&self.config.log_root, self.config.write_mode)?;
        Ok(JsonLoggingHandler::with_sink(&self.config, sink))
    }

    /// Create a handler writing to a caller-supplied sink.
    pub fn build_with_sink<S: TraceSink>(self, sink: S) -> JsonLoggingHandler<S> {
        JsonLoggingHandler::with_sink(&self.config, sink)
    }
}

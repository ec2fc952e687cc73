//! Snapshot sinks
//!
//! The logger hands its sink the complete trace after every mutation; a
//! sink never sees diffs.

use serde_json::Value;
use std::path::Path;
use tracelog_core::Result;

/// Destination of full-trace snapshots
pub trait TraceSink {
    /// Persist the complete trace, replacing whatever was persisted before
    fn persist(&mut self, snapshot: &Value) -> Result<()>;

    /// File backing this sink, if any
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Sink that keeps the last snapshot in memory
///
/// Nothing survives the process. Useful for ephemeral runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    last: Option<Value>,
    writes: usize,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent snapshot
    pub fn last(&self) -> Option<&Value> {
        self.last.as_ref()
    }

    /// Number of snapshots persisted so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TraceSink for MemorySink {
    fn persist(&mut self, snapshot: &Value) -> Result<()> {
        self.last = Some(snapshot.clone());
        self.writes += 1;
        Ok(())
    }
}

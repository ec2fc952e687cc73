//! The trace logging handler.
//!
//! [`JsonLoggingHandler`] is what the agent loop talks to. For every
//! notification it:
//!
//! 1. drops it if its kind is on the ignore list for its phase,
//! 2. classifies it into an action,
//! 3. applies the action to the in-memory [`TraceStore`],
//! 4. persists the complete trace if anything changed.
//!
//! All of this happens synchronously before the call returns.

use crate::classify::{Action, EventClassifier};
use crate::config::{LoggerConfig, TraceLoggerBuilder};
use crate::error::Result;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracelog_core::{EventKind, EventPhase, LogEntry, Payload, PromptMarkers};
use tracelog_durability::{JsonFileSink, TraceSink};
use tracelog_engine::{Cursor, TraceStore};
use tracing::debug;

/// Event handler that logs an agent's reasoning trace as nested JSON
///
/// # Example
///
/// ```ignore
/// use tracelog::prelude::*;
///
/// let mut handler = JsonLoggingHandler::builder().log_root("./logs").build()?;
///
/// handler.on_event_start(EventKind::Llm, Some(&payload), "evt-1", "root")?;
/// handler.on_event_end(EventKind::Llm, Some(&response), "evt-1", "root")?;
/// ```
#[derive(Debug)]
pub struct JsonLoggingHandler<S: TraceSink = JsonFileSink> {
    classifier: EventClassifier,
    store: TraceStore,
    sink: S,
    starts_to_ignore: HashSet<EventKind>,
    ends_to_ignore: HashSet<EventKind>,
}

impl JsonLoggingHandler<JsonFileSink> {
    /// Create a builder for handler configuration.
    pub fn builder() -> TraceLoggerBuilder {
        TraceLoggerBuilder::new()
    }

    /// Create a handler with default settings writing under `log_root`.
    pub fn open(log_root: impl AsRef<Path>) -> Result<Self> {
        Self::builder().log_root(log_root).build()
    }
}

impl<S: TraceSink> JsonLoggingHandler<S> {
    /// Create a handler writing to `sink`.
    ///
    /// The sink is expected to already hold an empty trace.
    pub fn with_sink(config: &LoggerConfig, sink: S) -> Self {
        Self {
            classifier: EventClassifier::new(config.markers.clone()),
            store: TraceStore::new(config.nesting),
            sink,
            starts_to_ignore: config.event_starts_to_ignore.iter().copied().collect(),
            ends_to_ignore: config.event_ends_to_ignore.iter().copied().collect(),
        }
    }

    /// Handle a notification sent before an operation runs.
    ///
    /// `event_id` and `parent_id` are accepted for interface compatibility
    /// with the agent loop; the trace's nesting comes from function-call
    /// boundaries, not from these ids.
    ///
    /// # Errors
    ///
    /// - `InvariantViolation`: a tool-output prompt lacks the QA system prompt
    /// - `NoTargetSection` / `MalformedTrace` / `NestedSection`: a function
    ///   call cannot be opened at this point of the trace
    /// - `Io` / `Serialization`: the trace could not be persisted
    pub fn on_event_start(
        &mut self,
        kind: EventKind,
        payload: Option<&Payload>,
        event_id: &str,
        parent_id: &str,
    ) -> Result<()> {
        if self.starts_to_ignore.contains(&kind) {
            debug!("Ignoring {} start (event {})", kind, event_id);
            return Ok(());
        }
        debug!("{} start (event {}, parent {})", kind, event_id, parent_id);
        let action = self.classifier.on_start(kind, payload)?;
        self.apply(EventPhase::Start, action)
    }

    /// Handle a notification sent after an operation completed.
    ///
    /// # Errors
    ///
    /// - `Io` / `Serialization`: the trace could not be persisted
    pub fn on_event_end(
        &mut self,
        kind: EventKind,
        payload: Option<&Payload>,
        event_id: &str,
        parent_id: &str,
    ) -> Result<()> {
        if self.ends_to_ignore.contains(&kind) {
            debug!("Ignoring {} end (event {})", kind, event_id);
            return Ok(());
        }
        debug!("{} end (event {}, parent {})", kind, event_id, parent_id);
        let action = self.classifier.on_end(kind, payload);
        self.apply(EventPhase::End, action)
    }

    /// Called when the agent loop starts a trace. Not used.
    pub fn start_trace(&mut self, trace_id: Option<&str>) {
        debug!("start_trace({:?})", trace_id);
    }

    /// Called when the agent loop ends a trace. Not used.
    pub fn end_trace(
        &mut self,
        trace_id: Option<&str>,
        trace_map: Option<&HashMap<String, Vec<String>>>,
    ) {
        debug!(
            "end_trace({:?}, {} mapped events)",
            trace_id,
            trace_map.map(|m| m.len()).unwrap_or(0)
        );
    }

    /// The complete trace, as persisted.
    pub fn trace(&self) -> Value {
        self.store.snapshot()
    }

    /// The in-memory trace store.
    pub fn store(&self) -> &TraceStore {
        &self.store
    }

    /// Where new entries currently go.
    pub fn cursor(&self) -> Cursor {
        self.store.cursor()
    }

    /// Number of function-call sections currently open.
    pub fn depth(&self) -> usize {
        self.store.depth()
    }

    /// Number of entries logged so far, at every level.
    pub fn entry_count(&self) -> usize {
        self.store.entry_count()
    }

    /// Prompt markers used for classification.
    pub fn markers(&self) -> &PromptMarkers {
        self.classifier.markers()
    }

    /// The sink receiving snapshots.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// File the trace is written to, if the sink has one.
    pub fn log_path(&self) -> Option<&Path> {
        self.sink.location()
    }

    /// Consume the handler, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn apply(&mut self, phase: EventPhase, action: Action) -> Result<()> {
        match action {
            Action::Skip => Ok(()),
            Action::Log(entry) => self.log_entry(phase, entry),
            Action::OpenSection => {
                self.store.open_section()?;
                self.persist()
            }
            Action::CloseSection(entry) => {
                self.store.close_section();
                self.log_entry(phase, entry)
            }
        }
    }

    /// Tag an entry with its phase and append it at the active level.
    fn log_entry(&mut self, phase: EventPhase, mut entry: LogEntry) -> Result<()> {
        entry.tag_phase(phase);
        if self.store.append_entry(entry) {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot();
        self.sink.persist(&snapshot)?;
        Ok(())
    }
}

//! Log entry type
//!
//! A [`LogEntry`] is an ordered mapping of string keys to JSON values.
//! Keys keep their insertion order all the way to disk, so `event_type`
//! is always the first field a reader sees.

use crate::event::{EventKind, EventPhase};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key under which function-call sections attach to an entry
pub const ADDITIONAL_CONTENT_KEY: &str = "additional_content";

/// Key wrapping the entries logged during one function call
pub const FUNCTION_CALL_KEY: &str = "function_call";

/// Empty field left on final answers for manual annotation
pub const SUBJECTIVE_GRADE_KEY: &str = "subjective grade from 1 to 10";

const EVENT_TYPE_KEY: &str = "event_type";

/// One record in the trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(Map<String, Value>);

impl LogEntry {
    /// Create an entry with no fields
    ///
    /// Empty entries are never written to the trace.
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Create an entry whose `event_type` is the kind's log name
    pub fn for_kind(kind: EventKind) -> Self {
        let mut fields = Map::new();
        fields.insert(EVENT_TYPE_KEY.to_string(), Value::from(kind.log_name()));
        Self(fields)
    }

    /// Add a field, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether a field is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Check whether the entry has no fields at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The `event_type` field, if it is a string
    pub fn event_type(&self) -> Option<&str> {
        self.0.get(EVENT_TYPE_KEY).and_then(Value::as_str)
    }

    /// Append the phase suffix to `event_type`
    ///
    /// Entries without a string `event_type` are left untouched.
    pub fn tag_phase(&mut self, phase: EventPhase) {
        if let Some(Value::String(event_type)) = self.0.get_mut(EVENT_TYPE_KEY) {
            event_type.push_str(phase.suffix());
        }
    }

    /// Borrow the underlying fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the entry, returning its fields
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for LogEntry {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

//! Replay a recorded event stream through the logging handler.
//!
//! Input is JSON Lines, one notification per line:
//!
//! ```text
//! {"phase": "start", "kind": "llm", "event_id": "e1", "payload": {"messages": [...]}}
//! {"phase": "end", "kind": "llm", "event_id": "e1", "payload": {"response": {...}}}
//! ```
//!
//! `event_id` defaults to a fresh v4 UUID and `parent_id` to `"root"`.
//! Blank lines are skipped.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracelog::{JsonLoggingHandler, TraceSink};
use tracelog_core::{EventKind, EventPhase, Payload};
use tracing::debug;
use uuid::Uuid;

const ROOT_PARENT_ID: &str = "root";

/// One recorded notification
#[derive(Debug, Deserialize)]
pub(crate) struct EventRecord {
    pub phase: EventPhase,
    pub kind: EventKind,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub payload: Option<Payload>,
}

/// Outcome of a replay
#[derive(Debug)]
pub(crate) struct ReplayReport {
    pub events: usize,
    pub entries: usize,
    pub path: Option<PathBuf>,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Replayed {} events into {} entries", self.events, self.entries)?;
        if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        Ok(())
    }
}

pub(crate) fn replay_file<S: TraceSink>(
    handler: JsonLoggingHandler<S>,
    events: &Path,
) -> Result<ReplayReport> {
    let file =
        File::open(events).with_context(|| format!("Failed to open {}", events.display()))?;
    replay(handler, BufReader::new(file))
}

/// Feed every line of `reader` to `handler`.
///
/// Stops at the first line that fails to parse or that the handler
/// rejects; everything logged before it is already persisted.
pub(crate) fn replay<S: TraceSink, R: BufRead>(
    mut handler: JsonLoggingHandler<S>,
    reader: R,
) -> Result<ReplayReport> {
    let mut events = 0;
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: EventRecord = serde_json::from_str(&line)
            .with_context(|| format!("Invalid event on line {}", line_no))?;

        let event_id = record
            .event_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let parent_id = record
            .parent_id
            .unwrap_or_else(|| ROOT_PARENT_ID.to_string());
        debug!("line {}: {} {:?}", line_no, record.kind, record.phase);

        let payload = record.payload.as_ref();
        let result = match record.phase {
            EventPhase::Start => {
                handler.on_event_start(record.kind, payload, &event_id, &parent_id)
            }
            EventPhase::End => handler.on_event_end(record.kind, payload, &event_id, &parent_id),
        };
        result.with_context(|| format!("Event on line {} was rejected", line_no))?;
        events += 1;
    }

    Ok(ReplayReport {
        events,
        entries: handler.entry_count(),
        path: handler.log_path().map(Path::to_path_buf),
    })
}

//! Trace file summaries.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracelog_core::{ADDITIONAL_CONTENT_KEY, FUNCTION_CALL_KEY};
use tracelog_durability::read_trace;

const UNTYPED: &str = "<untyped>";

/// Counts gathered from one trace
#[derive(Debug, Default, PartialEq, Serialize)]
pub(crate) struct TraceSummary {
    pub entries: usize,
    pub sections: usize,
    pub max_depth: usize,
    pub event_types: BTreeMap<String, usize>,
}

impl TraceSummary {
    pub(crate) fn from_trace(trace: &[Value]) -> Self {
        let mut summary = Self::default();
        summary.walk_level(trace, 0);
        summary
    }

    fn walk_level(&mut self, nodes: &[Value], depth: usize) {
        for node in nodes {
            match section_nodes(node) {
                Some(inner) => self.walk_section(inner, depth + 1),
                None => self.visit_entry(node, depth),
            }
        }
    }

    fn walk_section(&mut self, nodes: &[Value], depth: usize) {
        self.sections += 1;
        self.max_depth = self.max_depth.max(depth);
        self.walk_level(nodes, depth);
    }

    fn visit_entry(&mut self, entry: &Value, depth: usize) {
        self.entries += 1;
        let event_type = entry
            .get("event_type")
            .and_then(Value::as_str)
            .unwrap_or(UNTYPED);
        *self.event_types.entry(event_type.to_string()).or_insert(0) += 1;

        if let Some(attached) = entry.get(ADDITIONAL_CONTENT_KEY).and_then(Value::as_array) {
            for section in attached {
                if let Some(inner) = section_nodes(section) {
                    self.walk_section(inner, depth + 1);
                }
            }
        }
    }
}

/// The nodes of a `{"function_call": [...]}` object, if `value` is one
fn section_nodes(value: &Value) -> Option<&[Value]> {
    let object = value.as_object()?;
    if object.len() != 1 {
        return None;
    }
    object
        .get(FUNCTION_CALL_KEY)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

impl fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entries:   {}", self.entries)?;
        writeln!(f, "sections:  {}", self.sections)?;
        writeln!(f, "max depth: {}", self.max_depth)?;
        for (event_type, count) in &self.event_types {
            writeln!(f, "  {:<22} {}", event_type, count)?;
        }
        Ok(())
    }
}

pub(crate) fn inspect_file(path: &Path) -> Result<TraceSummary> {
    let trace =
        read_trace(path).with_context(|| format!("Failed to read trace {}", path.display()))?;
    let nodes = trace.as_array().map(Vec::as_slice).unwrap_or_default();
    Ok(TraceSummary::from_trace(nodes))
}

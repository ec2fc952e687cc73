//! Arena-backed trace store
//!
//! The root timeline and every section are vectors of [`TraceNode`]. A
//! leaf node holds one [`LogEntry`] plus the sections attached to it; a
//! section node refers to a section in the arena.
//!
//! ## Rendering
//!
//! [`TraceStore::snapshot`] produces the on-disk shape:
//!
//! ```text
//! [
//!   {"event_type": "LLM start", ..., "additional_content": [
//!       {"function_call": [ {"event_type": "LLM start", ...}, ... ]}
//!   ]},
//!   {"event_type": "FUNCTION_CALL end", "tool_output": "..."}
//! ]
//! ```

use crate::cursor::{Cursor, NestingPolicy, SectionId};
use serde_json::{Map, Value};
use tracelog_core::{Error, LogEntry, Result, ADDITIONAL_CONTENT_KEY, FUNCTION_CALL_KEY};
use tracing::debug;

/// A leaf of the trace: one entry and the sections attached to it
#[derive(Debug, Clone, PartialEq)]
pub struct LeafEntry {
    entry: LogEntry,
    attached: Vec<SectionId>,
}

impl LeafEntry {
    /// The logged entry
    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    /// Sections attached under `additional_content`, in order
    pub fn attached(&self) -> &[SectionId] {
        &self.attached
    }
}

/// One element of a level (the root timeline or a section)
#[derive(Debug, Clone, PartialEq)]
pub enum TraceNode {
    /// A logged entry
    Leaf(LeafEntry),
    /// A nested section
    Section(SectionId),
}

#[derive(Debug, Clone, Default)]
struct Section {
    nodes: Vec<TraceNode>,
}

/// The in-memory trace and its cursor
#[derive(Debug, Clone, Default)]
pub struct TraceStore {
    root: Vec<TraceNode>,
    sections: Vec<Section>,
    cursor: Cursor,
    /// Cursors to return to when the current section closes (Stack policy)
    enclosing: Vec<Cursor>,
    policy: NestingPolicy,
}

impl TraceStore {
    /// Create an empty store
    pub fn new(policy: NestingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Nesting policy in effect
    pub fn policy(&self) -> NestingPolicy {
        self.policy
    }

    /// Current cursor
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of sections currently open
    pub fn depth(&self) -> usize {
        match self.cursor {
            Cursor::AtRoot => 0,
            Cursor::InSection(_) => self.enclosing.len() + 1,
        }
    }

    /// Nodes at the root level
    pub fn root(&self) -> &[TraceNode] {
        &self.root
    }

    /// Nodes of a section
    pub fn section(&self, id: SectionId) -> Option<&[TraceNode]> {
        self.sections.get(id.0).map(|s| s.nodes.as_slice())
    }

    /// Number of sections ever opened
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of entries logged, at every level
    pub fn entry_count(&self) -> usize {
        let leaves = |nodes: &[TraceNode]| {
            nodes
                .iter()
                .filter(|n| matches!(n, TraceNode::Leaf(_)))
                .count()
        };
        leaves(&self.root) + self.sections.iter().map(|s| leaves(&s.nodes)).sum::<usize>()
    }

    /// Check whether nothing has been logged yet
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Append an entry at the active level
    ///
    /// Empty entries are dropped. Returns whether the trace changed, i.e.
    /// whether the caller needs to persist.
    pub fn append_entry(&mut self, entry: LogEntry) -> bool {
        if entry.is_empty() {
            return false;
        }
        let leaf = TraceNode::Leaf(LeafEntry {
            entry,
            attached: Vec::new(),
        });
        self.active_level_mut().push(leaf);
        true
    }

    /// Open a function-call section on the last node of the active level
    /// and move the cursor into it
    ///
    /// A leaf receives the section under `additional_content`, after any
    /// elements its own `additional_content` array already holds; a section
    /// node receives it as its next element.
    ///
    /// # Errors
    ///
    /// - `NestedSection`: a section is already open and the policy is `Reject`
    /// - `NoTargetSection`: the active level is empty
    /// - `MalformedTrace`: the last leaf has an `additional_content` field of
    ///   its own that is not an array
    ///
    /// The trace is unchanged on error.
    pub fn open_section(&mut self) -> Result<SectionId> {
        if self.policy == NestingPolicy::Reject && !self.cursor.is_root() {
            return Err(Error::NestedSection {
                depth: self.depth(),
            });
        }

        match self.active_level().last() {
            None => return Err(Error::NoTargetSection),
            Some(TraceNode::Leaf(leaf)) => {
                if let Some(existing) = leaf
                    .entry
                    .get(ADDITIONAL_CONTENT_KEY)
                    .filter(|v| !v.is_array())
                {
                    return Err(Error::MalformedTrace(format!(
                        "expected '{}' to hold function call sections but the entry already has {}",
                        ADDITIONAL_CONTENT_KEY,
                        json_type_name(existing)
                    )));
                }
            }
            Some(TraceNode::Section(_)) => {}
        }

        let id = SectionId(self.sections.len());
        let parent = match self.active_level_mut().last_mut() {
            Some(TraceNode::Leaf(leaf)) => {
                leaf.attached.push(id);
                None
            }
            Some(TraceNode::Section(parent)) => Some(*parent),
            None => return Err(Error::NoTargetSection),
        };
        if let Some(parent) = parent {
            self.sections[parent.0].nodes.push(TraceNode::Section(id));
        }
        self.sections.push(Section::default());

        match self.policy {
            NestingPolicy::Stack if !self.cursor.is_root() => self.enclosing.push(self.cursor),
            NestingPolicy::Replace if !self.cursor.is_root() => {
                debug!("Replacing cursor {:?} with {}", self.cursor, id)
            }
            _ => {}
        }
        self.cursor = Cursor::InSection(id);
        debug!("Opened {} at depth {}", id, self.depth());

        Ok(id)
    }

    /// Close the current section
    ///
    /// Under `Stack` the cursor returns to the enclosing section, otherwise
    /// to the root. Closing at the root is a no-op. Returns the new cursor.
    pub fn close_section(&mut self) -> Cursor {
        if self.cursor.is_root() {
            debug!("close_section called with no open section");
            return self.cursor;
        }
        self.cursor = match self.policy {
            NestingPolicy::Stack => self.enclosing.pop().unwrap_or(Cursor::AtRoot),
            NestingPolicy::Replace | NestingPolicy::Reject => {
                self.enclosing.clear();
                Cursor::AtRoot
            }
        };
        debug!("Closed section, cursor now {:?}", self.cursor);
        self.cursor
    }

    /// Render the complete trace as JSON
    pub fn snapshot(&self) -> Value {
        Value::Array(self.root.iter().map(|n| self.render_node(n)).collect())
    }

    fn active_level(&self) -> &Vec<TraceNode> {
        match self.cursor {
            Cursor::AtRoot => &self.root,
            Cursor::InSection(id) => &self.sections[id.0].nodes,
        }
    }

    fn active_level_mut(&mut self) -> &mut Vec<TraceNode> {
        match self.cursor {
            Cursor::AtRoot => &mut self.root,
            Cursor::InSection(id) => &mut self.sections[id.0].nodes,
        }
    }

    fn render_node(&self, node: &TraceNode) -> Value {
        match node {
            TraceNode::Leaf(leaf) => {
                let mut fields = leaf.entry.fields().clone();
                if !leaf.attached.is_empty() {
                    let sections: Vec<Value> = leaf
                        .attached
                        .iter()
                        .map(|id| self.render_section(*id))
                        .collect();
                    if let Some(Value::Array(existing)) = fields.get_mut(ADDITIONAL_CONTENT_KEY) {
                        existing.extend(sections);
                    } else {
                        fields.insert(ADDITIONAL_CONTENT_KEY.to_string(), Value::Array(sections));
                    }
                }
                Value::Object(fields)
            }
            TraceNode::Section(id) => self.render_section(*id),
        }
    }

    fn render_section(&self, id: SectionId) -> Value {
        let nodes = self.sections[id.0]
            .nodes
            .iter()
            .map(|n| self.render_node(n))
            .collect();
        let mut wrapper = Map::new();
        wrapper.insert(FUNCTION_CALL_KEY.to_string(), Value::Array(nodes));
        Value::Object(wrapper)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Cursor state machine
//!
//! ```text
//!              open_section                open_section (Stack)
//!   AtRoot ───────────────────► InSection(a) ─────────────────► InSection(b)
//!     ▲                            │    ▲                           │
//!     └────── close_section ───────┘    └────── close_section ──────┘
//! ```
//!
//! Under `Replace` the second `open_section` forgets `a` and the matching
//! close returns straight to `AtRoot`. Under `Reject` it fails.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a section in the store's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) usize);

impl SectionId {
    /// Position in the arena
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section-{}", self.0)
    }
}

/// Where the next entry is appended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// The root timeline
    #[default]
    AtRoot,
    /// An open function-call section
    InSection(SectionId),
}

impl Cursor {
    /// Whether the cursor points at the root timeline
    pub fn is_root(&self) -> bool {
        matches!(self, Cursor::AtRoot)
    }

    /// The open section, if any
    pub fn section(&self) -> Option<SectionId> {
        match self {
            Cursor::AtRoot => None,
            Cursor::InSection(id) => Some(*id),
        }
    }
}

/// Behaviour when a function call starts while another one is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingPolicy {
    /// Open the new section inside the current one; its end returns to the
    /// enclosing section
    #[default]
    Stack,
    /// Point the cursor at the new section; its end returns to the root
    Replace,
    /// Fail the start without touching the trace
    Reject,
}

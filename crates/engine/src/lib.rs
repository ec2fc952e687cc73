//! Trace engine for tracelog
//!
//! This crate owns the in-memory trace:
//! - [`TraceStore`]: arena of sections plus the root timeline
//! - [`Cursor`]: which level new entries go to
//! - [`NestingPolicy`]: what a function call opened inside another one does
//!
//! ## Design
//!
//! The trace is nested (a function call collects everything logged while it
//! runs), but nothing here holds a mutable reference into the middle of the
//! tree. Sections live in a flat arena and are addressed by [`SectionId`];
//! the cursor is a plain value. Every mutation is an index lookup followed
//! by a push.
//!
//! The store does no I/O. Callers persist [`TraceStore::snapshot`] after
//! each successful mutation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod store;

pub use cursor::{Cursor, NestingPolicy, SectionId};
pub use store::{LeafEntry, TraceNode, TraceStore};

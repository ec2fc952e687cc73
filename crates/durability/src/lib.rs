//! Durability layer for tracelog
//!
//! This crate writes the trace to storage:
//! - [`TraceSink`]: destination of full-trace snapshots
//! - [`JsonFileSink`]: one pretty-printed JSON file per run, rewritten on every mutation
//! - [`MemorySink`]: keeps the last snapshot in memory
//! - [`encode_pretty`] / [`read_trace`]: the on-disk encoding
//!
//! ## Write Modes
//!
//! | Mode | Mechanism | Crash mid-write |
//! |------|-----------|-----------------|
//! | Overwrite | truncate + write in place | file may be torn |
//! | Atomic | write sibling temp file + rename | previous snapshot survives |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding;
pub mod file;
pub mod sink;

pub use encoding::{encode_pretty, read_trace};
pub use file::{run_log_path, JsonFileSink, WriteMode, JSON_LOG_DIR};
pub use sink::{MemorySink, TraceSink};

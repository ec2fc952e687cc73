//! On-disk encoding of the trace
//!
//! The trace file is a single JSON array, pretty-printed with 4-space
//! indentation so it can be read and annotated by hand.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracelog_core::{Error, Result};

const INDENT: &[u8] = b"    ";

/// Encode a value as 4-space indented JSON
pub fn encode_pretty(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Read a persisted trace file
///
/// # Errors
///
/// - `Io`: the file cannot be read
/// - `Serialization`: the content is not JSON, or not a JSON array
pub fn read_trace(path: impl AsRef<Path>) -> Result<Value> {
    let bytes = fs::read(path.as_ref())?;
    let value: Value = serde_json::from_slice(&bytes)?;
    if !value.is_array() {
        return Err(Error::Serialization(format!(
            "{} does not contain a JSON array",
            path.as_ref().display()
        )));
    }
    Ok(value)
}

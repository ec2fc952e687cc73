//! JSON file sink
//!
//! Each logger run owns one file:
//!
//! ```text
//! <log_root>/
//! └── json/
//!     ├── 2024-01-20_14:13:48.log
//!     └── 2024-01-20_14:13:48_1.log    # second run within the same second
//! ```
//!
//! The file is created holding `[]` and is rewritten in full, never
//! appended to, on every persist.

use crate::encoding::encode_pretty;
use crate::sink::TraceSink;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracelog_core::Result;
use tracing::{debug, info};

/// Subdirectory of the log root holding trace files
pub const JSON_LOG_DIR: &str = "json";

/// Second-resolution timestamp used for trace file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

const LOG_EXTENSION: &str = "log";

/// How a snapshot replaces the previous file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Truncate and rewrite the file in place
    #[default]
    Overwrite,
    /// Write a sibling temp file, then rename it over the trace file
    Atomic,
}

/// Path of the trace file for a run started at `started`
pub fn run_log_path(log_root: impl AsRef<Path>, started: &DateTime<Local>) -> PathBuf {
    log_root
        .as_ref()
        .join(JSON_LOG_DIR)
        .join(format!("{}.{}", started.format(TIMESTAMP_FORMAT), LOG_EXTENSION))
}

/// Sink writing the trace to one pretty-printed JSON file
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
    mode: WriteMode,
    writes: usize,
}

impl JsonFileSink {
    /// Create the trace file for a run starting now
    ///
    /// Creates `<log_root>/json/` if needed and initialises the file with
    /// an empty trace.
    pub fn create(log_root: impl AsRef<Path>, mode: WriteMode) -> Result<Self> {
        Self::create_at(log_root, &Local::now(), mode)
    }

    /// Create the trace file for a run started at `started`
    ///
    /// If a run already claimed that timestamp a numeric suffix is added,
    /// so two runs never share a file.
    pub fn create_at(
        log_root: impl AsRef<Path>,
        started: &DateTime<Local>,
        mode: WriteMode,
    ) -> Result<Self> {
        let base = run_log_path(log_root, started);
        if let Some(dir) = base.parent() {
            fs::create_dir_all(dir)?;
        }
        let path = claim_unique(&base)?;
        Self::init(path, mode)
    }

    /// Use an explicit file path, truncating any existing content
    pub fn open(path: impl Into<PathBuf>, mode: WriteMode) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        Self::init(path, mode)
    }

    fn init(path: PathBuf, mode: WriteMode) -> Result<Self> {
        let sink = Self {
            path,
            mode,
            writes: 0,
        };
        sink.write_bytes(&encode_pretty(&Value::Array(Vec::new()))?)?;
        info!("Trace log initialised at {}", sink.path.display());
        Ok(sink)
    }

    /// Path of the trace file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write mode in effect
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Number of snapshots written since creation
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        match self.mode {
            WriteMode::Overwrite => fs::write(&self.path, bytes),
            WriteMode::Atomic => {
                let tmp = self.temp_path();
                let result = write_synced(&tmp, bytes).and_then(|()| fs::rename(&tmp, &self.path));
                if result.is_err() {
                    // Drop the partial snapshot
                    let _ = fs::remove_file(&tmp);
                }
                result
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension(format!("{}.tmp", LOG_EXTENSION))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl TraceSink for JsonFileSink {
    fn persist(&mut self, snapshot: &Value) -> Result<()> {
        let bytes = encode_pretty(snapshot)?;
        self.write_bytes(&bytes)?;
        self.writes += 1;
        debug!(
            "Rewrote {} ({} bytes, write #{})",
            self.path.display(),
            bytes.len(),
            self.writes
        );
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Create `base`, or `base` with `_1`, `_2`, ... before the extension,
/// whichever does not exist yet
fn claim_unique(base: &Path) -> io::Result<PathBuf> {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut candidate = base.to_path_buf();
    let mut n = 0u32;
    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                n += 1;
                candidate = base.with_file_name(format!("{}_{}.{}", stem, n, LOG_EXTENSION));
            }
            Err(e) => return Err(e),
        }
    }
}

//! Non-fatal warning reporting
//!
//! Missing lookup files and missing lookup entries never stop a run. They
//! are routed through a [`WarningSink`] so the join logic can be tested
//! without touching the file system.

use crate::error::Result;
use chrono::{SecondsFormat, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default location of the persisted warning log
pub const DEFAULT_WARNING_LOG: &str = "logs/warning.log";

/// Receiver for non-fatal warnings
pub trait WarningSink {
    /// Record one warning message
    fn warn(&mut self, message: &str) -> Result<()>;
}

/// Collects messages in memory
impl WarningSink for Vec<String> {
    fn warn(&mut self, message: &str) -> Result<()> {
        self.push(message.to_string());
        Ok(())
    }
}

/// Append-only warning log mirrored to the diagnostic stream
#[derive(Debug, Clone)]
pub struct WarningLog {
    path: PathBuf,
    written: usize,
}

impl WarningLog {
    /// Create a log that appends to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            written: 0,
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of warnings recorded through this handle
    pub fn count(&self) -> usize {
        self.written
    }

    fn append(&self, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(&timestamp(), message))?;
        Ok(())
    }
}

impl Default for WarningLog {
    fn default() -> Self {
        Self::new(DEFAULT_WARNING_LOG)
    }
}

impl WarningSink for WarningLog {
    fn warn(&mut self, message: &str) -> Result<()> {
        tracing::warn!("{}", message);
        self.append(message)?;
        self.written += 1;
        Ok(())
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_line(timestamp: &str, message: &str) -> String {
    format!("[{}] Warning: {}", timestamp, message)
}

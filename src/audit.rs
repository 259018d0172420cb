//! Append-only audit log recording the outcome of every move.
//!
//! Each line has the form `YYYY/MM/DD HH:MM:SS [SEVERITY] message`. The log
//! is owned by the run that opened it and is closed exactly once, either
//! explicitly through [`AuditLog::close`] or when it is dropped.

use crate::error::{OrganizeError, OrganizeResult};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

/// Default audit log file name, created in the working directory.
pub const DEFAULT_LOG_FILE: &str = "organizer.log";

const LINE_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Severity tag written in front of every audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => f.write_str("SUCCESS"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

/// Handle on the audit log sink.
///
/// A disabled log (or one whose sink failed mid-run) silently drops every
/// entry.
#[derive(Debug)]
pub struct AuditLog {
    path: Option<PathBuf>,
    sink: Option<LineWriter<File>>,
}

impl AuditLog {
    /// Opens `path` in create-if-missing, append mode.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::LogSinkUnavailable` if the file cannot be opened.
    pub fn open(path: &Path) -> OrganizeResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| OrganizeError::LogSinkUnavailable {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(path = %path.display(), "audit log opened");

        Ok(Self {
            path: Some(path.to_path_buf()),
            sink: Some(LineWriter::new(file)),
        })
    }

    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self {
            path: None,
            sink: None,
        }
    }

    /// Path of the backing file, if the log was opened from one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns true while entries are still being written.
    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log_success(&mut self, message: &str) {
        self.write_entry(Severity::Success, message);
    }

    pub fn log_error(&mut self, message: &str) {
        self.write_entry(Severity::Error, message);
    }

    fn write_entry(&mut self, severity: Severity, message: &str) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let timestamp = chrono::Local::now().format(LINE_TIMESTAMP_FORMAT);
        if let Err(e) = writeln!(sink, "{} [{}] {}", timestamp, severity, message) {
            // Drop the sink and keep the run going without auditing.
            let err = OrganizeError::LogSinkUnavailable {
                path: self.path.clone().unwrap_or_default(),
                source: e,
            };
            tracing::warn!(error = %err, "audit logging disabled for the rest of the run");
            self.sink = None;
        }
    }

    /// Flushes and closes the sink. Calling it again is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        match self.sink.take() {
            Some(mut sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AuditLog {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "failed to flush audit log on drop");
        }
    }
}

//! Error types shared by the mover, the walker and the audit log.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while organizing a directory tree.
///
/// Per-file variants are caught by the [`Organizer`](crate::Organizer) and
/// never abort a run. Only `InvalidRoot` and `LogSinkUnavailable` at startup
/// are fatal.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The file disappeared between the walk and the move.
    #[error("Source file no longer exists: {}", .path.display())]
    SourceMissing { path: PathBuf },

    /// The category directory could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file already sits at its destination path.
    #[error("Source and destination are the same file: {}", .path.display())]
    SameSourceAndDestination { path: PathBuf },

    /// The final rename failed (cross-device, permissions, late collision).
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory could not be read or an entry could not be stat'ed.
    #[error("Traversal error at {}: {reason}", display_optional(.path))]
    TraversalError {
        path: Option<PathBuf>,
        reason: String,
    },

    /// The audit log could not be opened or written.
    #[error("Audit log {} is unavailable: {source}", .path.display())]
    LogSinkUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The root directory handed to the organizer does not exist.
    #[error("Directory '{}' does not exist", .path.display())]
    InvalidRoot { path: PathBuf },
}

fn display_optional(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_failed_message_names_both_paths() {
        let err = OrganizeError::RenameFailed {
            from: PathBuf::from("/root/a.txt"),
            to: PathBuf::from("/root/Documents/a.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/root/a.txt"));
        assert!(message.contains("/root/Documents/a.txt"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_traversal_error_without_path() {
        let err = OrganizeError::TraversalError {
            path: None,
            reason: "loop detected".to_string(),
        };
        assert_eq!(err.to_string(), "Traversal error at <unknown>: loop detected");
    }
}

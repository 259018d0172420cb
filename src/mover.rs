/// Relocation of a single file into its category directory.
///
/// The mover creates the destination directory on demand, resolves name
/// collisions with a timestamp suffix and refuses to move a file onto itself.
/// Every outcome is written to the audit log exactly once.
use crate::audit::AuditLog;
use crate::error::{OrganizeError, OrganizeResult};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Format of the suffix inserted into colliding file names.
pub const COLLISION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Where the file was before the move.
    pub original_path: PathBuf,
    /// Where the file is now, possibly with a timestamp suffix.
    pub new_path: PathBuf,
    /// Name of the destination directory.
    pub category: String,
}

impl Operation {
    /// Final file name after collision resolution.
    pub fn file_name(&self) -> String {
        self.new_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Moves files into category directories.
pub struct FileMover;

impl FileMover {
    /// Moves `source` into `destination_dir` and records the outcome in `audit`.
    ///
    /// # Arguments
    ///
    /// * `source` - An existing regular file
    /// * `destination_dir` - The category directory; created if missing
    /// * `audit` - The run's audit log
    ///
    /// # Errors
    ///
    /// * `SourceMissing` if `source` is no longer a regular file
    /// * `DirectoryCreateFailed` if `destination_dir` cannot be created
    /// * `SameSourceAndDestination` if the file already sits at its destination
    /// * `RenameFailed` if the rename fails or the destination got taken
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::audit::AuditLog;
    /// use dirsort::mover::FileMover;
    /// use std::path::Path;
    ///
    /// let mut audit = AuditLog::disabled();
    /// match FileMover::move_file(Path::new("/data/a.txt"), Path::new("/data/Documents"), &mut audit) {
    ///     Ok(op) => println!("Moved to {}", op.new_path.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_file(
        source: &Path,
        destination_dir: &Path,
        audit: &mut AuditLog,
    ) -> OrganizeResult<Operation> {
        Self::move_file_at(source, destination_dir, audit, Local::now())
    }

    /// Like [`FileMover::move_file`], with the collision timestamp supplied.
    pub fn move_file_at(
        source: &Path,
        destination_dir: &Path,
        audit: &mut AuditLog,
        now: DateTime<Local>,
    ) -> OrganizeResult<Operation> {
        let result = Self::relocate(source, destination_dir, now);
        match &result {
            Ok(operation) => audit.log_success(&format!(
                "File {} moved to directory {}",
                operation.file_name(),
                operation.category
            )),
            Err(e) => audit.log_error(&e.to_string()),
        }
        result
    }

    fn relocate(
        source: &Path,
        destination_dir: &Path,
        now: DateTime<Local>,
    ) -> OrganizeResult<Operation> {
        // The walk and the move are not atomic; re-check the source.
        let is_file = fs::symlink_metadata(source)
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(OrganizeError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        fs::create_dir_all(destination_dir).map_err(|e| {
            OrganizeError::DirectoryCreateFailed {
                path: destination_dir.to_path_buf(),
                source: e,
            }
        })?;

        let file_name = source
            .file_name()
            .ok_or_else(|| OrganizeError::SourceMissing {
                path: source.to_path_buf(),
            })?;
        let candidate = destination_dir.join(file_name);

        if same_path(source, &candidate) {
            return Err(OrganizeError::SameSourceAndDestination {
                path: source.to_path_buf(),
            });
        }

        let destination = if exists(&candidate) {
            timestamped_path(&candidate, &now)
        } else {
            candidate
        };

        // Never overwrite: a collision surviving the suffix is a failure.
        if exists(&destination) {
            return Err(OrganizeError::RenameFailed {
                from: source.to_path_buf(),
                to: destination,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "destination already exists",
                ),
            });
        }

        fs::rename(source, &destination).map_err(|e| OrganizeError::RenameFailed {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        tracing::debug!(
            from = %source.display(),
            to = %destination.display(),
            "moved file"
        );

        let category = destination_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Operation {
            original_path: source.to_path_buf(),
            new_path: destination,
            category,
        })
    }
}

/// Inserts `_<timestamp>` between the stem and the extension of `path`.
///
/// `Documents/a.txt` becomes `Documents/a_2024-05-01_13-45-00.txt`.
pub fn timestamped_path(path: &Path, now: &DateTime<Local>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = now.format(COLLISION_TIMESTAMP_FORMAT);

    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, stamp),
    };

    path.with_file_name(name)
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

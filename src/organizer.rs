//! Walks a directory tree and sorts every matching file into its category.
//!
//! The walk happens in two phases. First the tree is snapshotted into a list
//! of candidate files. Then each candidate is moved. Files moved during a run
//! are therefore never visited twice. Category directories under the root are
//! walked like any other; only files already sitting in their own category
//! directory are left where they are.

use crate::audit::AuditLog;
use crate::config::CompiledFilters;
use crate::error::{OrganizeError, OrganizeResult};
use crate::mover::{FileMover, Operation};
use crate::output::OutputFormatter;
use crate::rules::{Category, RuleTable};
use crate::stats::Statistics;
use indicatif::ProgressBar;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file queued for moving.
#[derive(Debug, Clone)]
struct Candidate {
    path: PathBuf,
    category: Category,
}

/// State of one organization run over a single root directory.
///
/// The organizer owns the audit log for the duration of the run; it is closed
/// by [`Organizer::close`] or when the organizer is dropped.
///
/// # Examples
///
/// ```no_run
/// use dirsort::{AuditLog, Organizer};
/// use std::path::Path;
///
/// let audit = AuditLog::open(Path::new("organizer.log"))?;
/// let mut organizer = Organizer::new("/home/user/Downloads", audit)?;
/// let moved = organizer.run()?;
/// println!("Sorted {} files", moved);
/// organizer.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Organizer {
    root: PathBuf,
    rules: RuleTable,
    filters: CompiledFilters,
    audit: AuditLog,
    stats: Statistics,
    operations: Vec<Operation>,
    show_progress: bool,
}

impl Organizer {
    /// Creates an organizer for `root`.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidRoot` if `root` does not exist.
    pub fn new(root: impl Into<PathBuf>, audit: AuditLog) -> OrganizeResult<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(OrganizeError::InvalidRoot { path: root });
        }

        Ok(Self {
            root,
            rules: RuleTable::default(),
            filters: CompiledFilters::allow_all(),
            audit,
            stats: Statistics::new(),
            operations: Vec::new(),
            show_progress: false,
        })
    }

    /// Restricts which files are eligible for sorting.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Shows a progress bar while moving. Moved files are echoed either way.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Moves performed so far, in the order they happened.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Sorts the tree and returns the number of files moved by this call.
    ///
    /// Per-file failures are logged and skipped; they never abort the run.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidRoot` if the root vanished since
    /// [`Organizer::new`].
    pub fn run(&mut self) -> OrganizeResult<u64> {
        if !self.root.exists() {
            return Err(OrganizeError::InvalidRoot {
                path: self.root.clone(),
            });
        }

        tracing::info!(root = %self.root.display(), "organizing directory");

        let candidates = self.collect_candidates();
        let progress = if self.show_progress {
            OutputFormatter::create_progress_bar(candidates.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let mut moved = 0;
        for candidate in &candidates {
            if let Some(operation) = self.process(candidate) {
                let line = echo_line(&operation);
                if progress.is_hidden() {
                    OutputFormatter::success(&line);
                } else {
                    progress.println(format!("✓ {}", line));
                }
                self.operations.push(operation);
                moved += 1;
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        tracing::info!(
            moved,
            candidates = candidates.len(),
            "finished organizing directory"
        );
        Ok(moved)
    }

    /// Flushes and closes the audit log. Safe to call more than once.
    pub fn close(&mut self) -> io::Result<()> {
        self.audit.close()
    }

    fn collect_candidates(&mut self) -> Vec<Candidate> {
        let root = self.root.clone();
        let audit_log = self.audit.path().and_then(|p| fs::canonicalize(p).ok());
        let mut candidates = Vec::new();

        for entry in WalkDir::new(&root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.report_failure(&OrganizeError::TraversalError {
                        path: e.path().map(Path::to_path_buf),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            // Directories are traversed, never classified.
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(category) = self.rules.classify_path(entry.path()) else {
                continue;
            };

            if is_already_sorted(&entry, category) {
                continue;
            }

            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            if !self.filters.should_include(relative) {
                tracing::debug!(path = %entry.path().display(), "excluded by filters");
                continue;
            }

            if is_same_file(entry.path(), audit_log.as_deref()) {
                continue;
            }

            tracing::debug!(path = %entry.path().display(), %category, "queued");
            candidates.push(Candidate {
                path: entry.into_path(),
                category,
            });
        }

        candidates
    }

    fn process(&mut self, candidate: &Candidate) -> Option<Operation> {
        // Size has to be read before the move; the old path is gone afterwards.
        let size = match fs::symlink_metadata(&candidate.path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.report_failure(&OrganizeError::SourceMissing {
                    path: candidate.path.clone(),
                });
                return None;
            }
            Err(e) => {
                self.report_failure(&OrganizeError::TraversalError {
                    path: Some(candidate.path.clone()),
                    reason: e.to_string(),
                });
                return None;
            }
        };

        let destination_dir = self.root.join(candidate.category.dir_name());
        match FileMover::move_file(&candidate.path, &destination_dir, &mut self.audit) {
            Ok(operation) => {
                self.stats.record(candidate.category, size);
                Some(operation)
            }
            Err(e) => {
                // Already in the audit log.
                tracing::warn!(error = %e, "file left in place");
                None
            }
        }
    }

    fn report_failure(&mut self, err: &OrganizeError) {
        tracing::warn!(error = %err, "skipping entry");
        self.audit.log_error(&err.to_string());
    }
}

fn echo_line(operation: &Operation) -> String {
    format!("{} → {}/", operation.file_name(), operation.category)
}

/// True for `<root>/<Category>/<name>` where the file belongs to `Category`.
fn is_already_sorted(entry: &DirEntry, category: Category) -> bool {
    entry.depth() == 2
        && entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir == category.dir_name())
}

fn is_same_file(path: &Path, canonical: Option<&Path>) -> bool {
    let Some(canonical) = canonical else {
        return false;
    };
    if path.file_name() != canonical.file_name() {
        return false;
    }
    fs::canonicalize(path)
        .map(|p| p == canonical)
        .unwrap_or(false)
}

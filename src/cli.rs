//! Command-line interface for dirsort.
//!
//! This module handles:
//! - Argument parsing
//! - Asking for the root directory when none is given
//! - Wiring configuration, the audit log and the organizer together
//! - Printing the final report

use crate::audit::AuditLog;
use crate::config::{CompiledFilters, OrganizerConfig};
use crate::organizer::Organizer;
use crate::output::{OutputFormatter, ReportPrinter};
use crate::rules::RuleTable;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Sort the files of a directory tree into category subdirectories.
#[derive(Debug, Clone, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Directory to organize. Asked for interactively when omitted.
    pub path: Option<PathBuf>,

    /// Configuration file (defaults to .dirsortrc.toml, then ~/.config/dirsort/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Audit log file, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Runs one organization pass as described by `cli`.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["dirsort", "/home/user/Downloads"]);
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: Cli) -> Result<(), String> {
    let root = match cli.path {
        Some(path) => path,
        None => {
            OutputFormatter::banner(&RuleTable::default());
            let stdin = io::stdin();
            let stdout = io::stdout();
            prompt_for_root(stdin.lock(), stdout.lock())
                .map_err(|e| format!("Error reading input: {}", e))?
        }
    };

    if !root.exists() {
        return Err(format!("Directory '{}' does not exist", root.display()));
    }

    let config = OrganizerConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let filters = config
        .filters
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let log_path = cli.log_file.unwrap_or(config.organizer.log_file);
    let show_progress = config.organizer.show_progress && !cli.no_progress;

    organize(&root, &log_path, show_progress, filters)
}

fn organize(
    root: &Path,
    log_path: &Path,
    show_progress: bool,
    filters: CompiledFilters,
) -> Result<(), String> {
    let audit = AuditLog::open(log_path).map_err(|e| format!("Error initializing logging: {}", e))?;

    OutputFormatter::info(&format!("Organizing contents of: {}", root.display()));

    let mut organizer = Organizer::new(root, audit)
        .map_err(|e| e.to_string())?
        .with_filters(filters)
        .with_progress(show_progress);

    organizer
        .run()
        .map_err(|e| format!("Error while sorting: {}", e))?;

    ReportPrinter::print(organizer.statistics());

    if let Err(e) = organizer.close() {
        OutputFormatter::warning(&format!("Could not flush audit log: {}", e));
    }

    OutputFormatter::success("Sorting complete!");
    Ok(())
}

/// Asks for the directory to organize until an existing path is entered.
///
/// Input is trimmed; an empty line selects the current directory.
///
/// # Errors
///
/// Fails if `input` cannot be read or reaches end of input first.
pub fn prompt_for_root<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<PathBuf> {
    loop {
        write!(
            output,
            "Enter the directory to organize (or press Enter for the current one): "
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no directory given",
            ));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            writeln!(output, "Using the current directory")?;
            return Ok(PathBuf::from("."));
        }

        let path = PathBuf::from(trimmed);
        if path.exists() {
            return Ok(path);
        }

        writeln!(
            output,
            "Error: directory '{}' does not exist. Try again.\n",
            trimmed
        )?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "dirsort",
            "/tmp/inbox",
            "--config",
            "sort.toml",
            "--log-file",
            "audit.log",
            "--no-progress",
        ]);

        assert_eq!(cli.path, Some(PathBuf::from("/tmp/inbox")));
        assert_eq!(cli.config, Some(PathBuf::from("sort.toml")));
        assert_eq!(cli.log_file, Some(PathBuf::from("audit.log")));
        assert!(cli.no_progress);
    }

    #[test]
    fn test_cli_path_is_optional() {
        let cli = Cli::parse_from(["dirsort"]);
        assert!(cli.path.is_none());
        assert!(!cli.no_progress);
    }

    #[test]
    fn test_prompt_empty_input_selects_current_dir() {
        let mut output = Vec::new();
        let path = prompt_for_root(Cursor::new("   \n"), &mut output).expect("Prompt failed");
        assert_eq!(path, PathBuf::from("."));
    }

    #[test]
    fn test_prompt_retries_until_path_exists() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let input = format!("/non/existent/dir\n  {}  \n", temp_dir.path().display());

        let mut output = Vec::new();
        let path = prompt_for_root(Cursor::new(input), &mut output).expect("Prompt failed");

        assert_eq!(path, temp_dir.path());
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("'/non/existent/dir' does not exist"));
    }

    #[test]
    fn test_prompt_eof_is_an_error() {
        let mut output = Vec::new();
        let result = prompt_for_root(Cursor::new(""), &mut output);
        assert_eq!(
            result.unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}

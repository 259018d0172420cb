//! Organizer settings and file exclusion rules.
//!
//! Settings are read from a TOML file. They never change which extension maps
//! to which category; they only choose where the audit log goes and which
//! files are left alone.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organizer]
//! log_file = "organizer.log"
//! show_progress = true
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = ["keep-me.txt"]
//! patterns = ["projects/**"]
//! regex = ["^draft_"]
//!
//! [filters.include]
//! patterns = ["projects/export/*.pdf"]
//! ```

use crate::audit::DEFAULT_LOG_FILE;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".dirsortrc.toml";

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerConfig {
    #[serde(default)]
    pub organizer: OrganizerSettings,

    #[serde(default)]
    pub filters: FilterRules,
}

/// Run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerSettings {
    /// Audit log location, relative to the working directory.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Show a progress bar while moving files.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for OrganizerSettings {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            show_progress: true,
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_true() -> bool {
    true
}

/// Which files take part in sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether dot-files are sorted too. Defaults to true.
    #[serde(default = "default_true")]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist that overrides every exclusion.
    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns, matched against the path relative to the root.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regexes, matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given
    /// 2. `.dirsortrc.toml` in the current directory
    /// 3. `~/.config/dirsort/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a file is found (or named) but cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dirsort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

impl FilterRules {
    /// Compile into matchers, validating every pattern.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self)
    }
}

/// Pre-compiled filter rules.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Filters that let every file through.
    pub fn allow_all() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Whether the file at `relative_path` (relative to the root) may be sorted.
    ///
    /// Include patterns win; then hidden files, exact names, globs and
    /// regexes exclude, in that order.
    pub fn should_include(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|p| p.matches_path(relative_path))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|p| p.matches_path(relative_path))
        {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(&file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self::allow_all()
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rules_with_exclude(exclude: ExcludeRules) -> FilterRules {
        FilterRules {
            exclude,
            ..FilterRules::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = OrganizerConfig::default();
        assert_eq!(config.organizer.log_file, PathBuf::from("organizer.log"));
        assert!(config.organizer.show_progress);
        assert!(config.filters.enable_hidden_files);
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config = OrganizerConfig::from_toml(
            r#"
            [organizer]
            show_progress = false
            "#,
        )
        .expect("Failed to parse config");

        assert!(!config.organizer.show_progress);
        assert_eq!(config.organizer.log_file, PathBuf::from("organizer.log"));
        assert!(config.filters.exclude.patterns.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = OrganizerConfig::from_toml(
            r#"
            [organizer]
            log_file = "/var/log/dirsort.log"

            [filters]
            enable_hidden_files = false

            [filters.exclude]
            filenames = ["keep.txt"]
            patterns = ["projects/**"]
            regex = ["^draft_"]

            [filters.include]
            patterns = ["projects/export/*.pdf"]
            "#,
        )
        .expect("Failed to parse config");

        assert_eq!(
            config.organizer.log_file,
            PathBuf::from("/var/log/dirsort.log")
        );
        assert!(!config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.filenames, vec!["keep.txt"]);
        assert_eq!(config.filters.include.patterns.len(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        let result = OrganizerConfig::from_toml("[organizer\nlog_file = ");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[organizer]\nlog_file = \"custom.log\"\n").expect("Failed to write config");

        let config = OrganizerConfig::load(Some(&path)).expect("Failed to load config");
        assert_eq!(config.organizer.log_file, PathBuf::from("custom.log"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = OrganizerConfig::load(Some(Path::new("/non/existent/dirsort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_allow_all_includes_everything() {
        let filters = CompiledFilters::allow_all();
        assert!(filters.should_include(Path::new(".hidden.txt")));
        assert!(filters.should_include(Path::new("a/b/c.pdf")));
    }

    #[test]
    fn test_hidden_files_excluded_when_disabled() {
        let rules = FilterRules {
            enable_hidden_files: false,
            ..FilterRules::default()
        };
        let filters = rules.compile().unwrap();

        assert!(!filters.should_include(Path::new(".secret.pdf")));
        assert!(filters.should_include(Path::new("public.pdf")));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let filters = rules_with_exclude(ExcludeRules {
            filenames: vec!["keep.txt".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!filters.should_include(Path::new("keep.txt")));
        assert!(!filters.should_include(Path::new("nested/keep.txt")));
        assert!(filters.should_include(Path::new("other.txt")));
    }

    #[test]
    fn test_exclude_glob_respects_directory_boundaries() {
        let filters = rules_with_exclude(ExcludeRules {
            patterns: vec!["**/projects/**".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!filters.should_include(Path::new("projects/spec.pdf")));
        assert!(!filters.should_include(Path::new("work/projects/spec.pdf")));
        assert!(filters.should_include(Path::new("my_projects/spec.pdf")));
    }

    #[test]
    fn test_exclude_regex_matches_file_name() {
        let filters = rules_with_exclude(ExcludeRules {
            regex: vec![r"^draft_.*\.docx$".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!filters.should_include(Path::new("draft_letter.docx")));
        assert!(!filters.should_include(Path::new("sub/draft_memo.docx")));
        assert!(filters.should_include(Path::new("letter.docx")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let rules = FilterRules {
            enable_hidden_files: true,
            exclude: ExcludeRules {
                patterns: vec!["projects/**".to_string()],
                ..Default::default()
            },
            include: IncludeRules {
                patterns: vec!["projects/export/*.pdf".to_string()],
            },
        };
        let filters = rules.compile().unwrap();

        assert!(filters.should_include(Path::new("projects/export/final.pdf")));
        assert!(!filters.should_include(Path::new("projects/notes.txt")));
    }

    #[test]
    fn test_invalid_patterns_rejected() {
        let bad_glob = rules_with_exclude(ExcludeRules {
            patterns: vec!["[unclosed".to_string()],
            ..Default::default()
        });
        assert!(matches!(
            bad_glob.compile(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));

        let bad_regex = rules_with_exclude(ExcludeRules {
            regex: vec!["[invalid(".to_string()],
            ..Default::default()
        });
        assert!(matches!(
            bad_regex.compile(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}

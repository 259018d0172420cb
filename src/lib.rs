//! dirsort - sort a directory tree into category folders by file extension
//!
//! This library walks a root directory, classifies regular files against a
//! fixed extension table, moves each match into `<root>/<Category>`, keeps
//! per-category statistics and writes every outcome to an audit log.

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod mover;
pub mod organizer;
pub mod output;
pub mod rules;
pub mod stats;

pub use audit::AuditLog;
pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use error::{OrganizeError, OrganizeResult};
pub use mover::{FileMover, Operation};
pub use organizer::Organizer;
pub use rules::{Category, RuleTable};
pub use stats::{CategoryStats, Statistics};

pub use cli::{Cli, run_cli};

//! Console output: styled messages, the move progress bar and the final report.

use crate::rules::{Category, RuleTable};
use crate::stats::Statistics;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Styled console messages.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Progress bar over the files queued for moving.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(10);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints the welcome banner listing every category and its extensions.
    pub fn banner(rules: &RuleTable) {
        Self::header("=== File Organizer ===");
        Self::plain("Files are sorted into these categories:");
        for category in Category::ALL {
            let extensions: Vec<_> = rules
                .extensions_for(category)
                .into_iter()
                .map(|ext| ext.trim_start_matches('.'))
                .collect();
            Self::plain(&format!("- {} ({})", category, extensions.join(", ")));
        }
        Self::plain("");
    }
}

/// Renders run statistics.
pub struct ReportPrinter;

impl ReportPrinter {
    pub const TITLE: &'static str = "=== File Organization Report ===";
    pub const NOTHING_PROCESSED: &'static str = "No files processed";

    /// Renders the report body, one entry per line, without styling.
    ///
    /// Categories are listed by name.
    pub fn render(stats: &Statistics) -> Vec<String> {
        if stats.is_empty() {
            return vec![Self::NOTHING_PROCESSED.to_string()];
        }

        let mut lines = vec![
            format!("Total files processed: {}", stats.processed_files()),
            format!("Total size: {}", format_megabytes(stats.total_size())),
            String::new(),
            "Statistics by category:".to_string(),
        ];

        let mut categories: Vec<_> = stats.iter().collect();
        categories.sort_by_key(|(category, _)| category.dir_name());

        for (category, entry) in categories {
            lines.push(format!("{}:", category));
            lines.push(format!("  - Files: {}", entry.count));
            lines.push(format!(
                "  - Total size: {}",
                format_megabytes(entry.total_size)
            ));
        }

        lines
    }

    /// Prints the report to stdout.
    pub fn print(stats: &Statistics) {
        OutputFormatter::header(Self::TITLE);
        for line in Self::render(stats) {
            if line.ends_with(':') && !line.starts_with(' ') {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
        println!();
    }
}

/// Formats a byte count in megabytes (1 MB = 1,048,576 bytes), one decimal.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / BYTES_PER_MB)
}

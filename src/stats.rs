//! Per-category counters accumulated during a run.

use crate::rules::Category;
use std::collections::HashMap;

/// Count and cumulative size of the files moved into one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub count: u64,
    /// Sum of pre-move file sizes, in bytes.
    pub total_size: u64,
}

/// Statistics for one run.
///
/// Entries are only created by [`Statistics::record`], which the organizer
/// calls after a confirmed move, so every entry stands for at least one file.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    processed_files: u64,
    by_category: HashMap<Category, CategoryStats>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successfully moved file of `size` bytes.
    pub(crate) fn record(&mut self, category: Category, size: u64) {
        let entry = self.by_category.entry(category).or_default();
        entry.count += 1;
        entry.total_size += size;
        self.processed_files += 1;
    }

    pub fn processed_files(&self) -> u64 {
        self.processed_files
    }

    /// Total bytes across all categories.
    pub fn total_size(&self) -> u64 {
        self.by_category.values().map(|s| s.total_size).sum()
    }

    pub fn get(&self, category: Category) -> Option<&CategoryStats> {
        self.by_category.get(&category)
    }

    /// Iterates over categories in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryStats)> {
        self.by_category.iter().map(|(c, s)| (*c, s))
    }

    pub fn is_empty(&self) -> bool {
        self.processed_files == 0
    }
}

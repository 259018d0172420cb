//! Extension rule table for classifying files into categories.
//!
//! The table is fixed at compile time: every rule maps a dot-prefixed
//! extension to one [`Category`]. Lookups are case-sensitive.
//!
//! # Examples
//!
//! ```
//! use dirsort::rules::{Category, RuleTable};
//!
//! let rules = RuleTable::default();
//! assert_eq!(rules.classify(".png"), Some(Category::Images));
//! assert_eq!(rules.classify(".mp3"), Some(Category::Music));
//! assert_eq!(rules.classify(".PNG"), None);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A destination category. Its name doubles as the subdirectory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Music files (MP3, WAV)
    Music,
    /// Image files (JPG, JPEG, PNG)
    Images,
    /// Document files (PDF, DOC, DOCX, TXT)
    Documents,
    /// Video files (MP4, AVI)
    Video,
    /// Archive files (ZIP, RAR)
    Archives,
}

impl Category {
    /// All categories, in the order they are listed to the user.
    pub const ALL: [Category; 5] = [
        Category::Documents,
        Category::Images,
        Category::Music,
        Category::Video,
        Category::Archives,
    ];

    /// Returns the directory name for this category.
    ///
    /// ```
    /// use dirsort::rules::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Archives.dir_name(), "Archives");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Music => "Music",
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Video => "Video",
            Category::Archives => "Archives",
        }
    }

    /// Looks up a category by its directory name.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps dot-prefixed file extensions to categories.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<&'static str, Category>,
}

impl RuleTable {
    /// Creates the table with the built-in rules.
    pub fn new() -> Self {
        let rules = [
            (".mp3", Category::Music),
            (".wav", Category::Music),
            (".jpg", Category::Images),
            (".jpeg", Category::Images),
            (".png", Category::Images),
            (".pdf", Category::Documents),
            (".doc", Category::Documents),
            (".docx", Category::Documents),
            (".txt", Category::Documents),
            (".mp4", Category::Video),
            (".avi", Category::Video),
            (".zip", Category::Archives),
            (".rar", Category::Archives),
        ]
        .into_iter()
        .collect();

        Self { rules }
    }

    /// Maps an extension (with its leading dot) to a category.
    pub fn classify(&self, extension: &str) -> Option<Category> {
        self.rules.get(extension).copied()
    }

    /// Classifies a path by the extension of its file name.
    ///
    /// ```
    /// use dirsort::rules::{Category, RuleTable};
    /// use std::path::Path;
    ///
    /// let rules = RuleTable::default();
    /// assert_eq!(rules.classify_path(Path::new("a/b/report.pdf")), Some(Category::Documents));
    /// assert_eq!(rules.classify_path(Path::new("notes")), None);
    /// ```
    pub fn classify_path(&self, path: &Path) -> Option<Category> {
        extension_of(path).and_then(|ext| self.classify(&ext))
    }

    /// Extensions mapped to `category`, sorted.
    pub fn extensions_for(&self, category: Category) -> Vec<&'static str> {
        let mut extensions: Vec<_> = self
            .rules
            .iter()
            .filter(|&(_, c)| *c == category)
            .map(|(ext, _)| *ext)
            .collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the extension of `path` including its leading dot.
///
/// Names whose only dot is the leading one (`.bashrc`) have no extension.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Music.dir_name(), "Music");
        assert_eq!(Category::Images.dir_name(), "Images");
        assert_eq!(Category::Documents.dir_name(), "Documents");
        assert_eq!(Category::Video.dir_name(), "Video");
        assert_eq!(Category::Archives.dir_name(), "Archives");
    }

    #[test]
    fn test_from_dir_name_round_trips() {
        for category in Category::ALL {
            assert_eq!(Category::from_dir_name(category.dir_name()), Some(category));
        }
        assert_eq!(Category::from_dir_name("images"), None);
        assert_eq!(Category::from_dir_name("Other"), None);
    }

    #[test]
    fn test_classify_builtin_rules() {
        let rules = RuleTable::default();
        assert_eq!(rules.classify(".wav"), Some(Category::Music));
        assert_eq!(rules.classify(".jpeg"), Some(Category::Images));
        assert_eq!(rules.classify(".docx"), Some(Category::Documents));
        assert_eq!(rules.classify(".avi"), Some(Category::Video));
        assert_eq!(rules.classify(".rar"), Some(Category::Archives));
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let rules = RuleTable::default();
        assert_eq!(rules.classify(".JPG"), None);
        assert_eq!(rules.classify(".Pdf"), None);
    }

    #[test]
    fn test_classify_requires_leading_dot() {
        let rules = RuleTable::default();
        assert_eq!(rules.classify("pdf"), None);
        assert_eq!(rules.classify(""), None);
    }

    #[test]
    fn test_classify_unknown_extension() {
        let rules = RuleTable::default();
        assert_eq!(rules.classify(".rs"), None);
        assert_eq!(rules.classify(".gif"), None);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("photo.png")), Some(".png".to_string()));
        assert_eq!(extension_of(Path::new("backup.tar.zip")), Some(".zip".to_string()));
        assert_eq!(extension_of(Path::new("dir/README")), None);
        assert_eq!(extension_of(Path::new(".bashrc")), None);
    }

    #[test]
    fn test_classify_path_uses_last_extension() {
        let rules = RuleTable::default();
        assert_eq!(
            rules.classify_path(Path::new("bundle.txt.zip")),
            Some(Category::Archives)
        );
        assert_eq!(rules.classify_path(Path::new("song.mp3.part")), None);
    }

    #[test]
    fn test_extensions_for() {
        let rules = RuleTable::default();
        assert_eq!(
            rules.extensions_for(Category::Documents),
            vec![".doc", ".docx", ".pdf", ".txt"]
        );
        assert_eq!(rules.extensions_for(Category::Music), vec![".mp3", ".wav"]);
    }
}

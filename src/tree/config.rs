//! Configuration types for the walker

/// Order of entries within one directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Directories first, then files grouped by extension.
    #[default]
    Type,
    /// Plain name order, directories and files interleaved.
    Name,
    /// Directories first, then files largest first.
    Size,
    /// Directories first, then files most recently modified first.
    Modified,
}

/// Configuration for tree walking behavior.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Deepest level to list; direct children of the root are level 1.
    pub max_depth: Option<usize>,
    pub show_hidden: bool,
    /// Entry names excluded wherever they appear.
    pub exclude_names: Vec<String>,
    /// File extensions to exclude, with or without the leading dot.
    pub exclude_extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Entries matching these are kept even when otherwise excluded.
    pub include_patterns: Vec<String>,
    /// Treat patterns as regular expressions instead of globs.
    pub use_regex: bool,
    /// Name of a gitignore-syntax file honored in every directory, e.g. `.gitignore`.
    pub ignore_file: Option<String>,
    pub sort: SortOrder,
    pub ignore_case: bool,
    pub collect_size: bool,
    pub collect_modified: bool,
}

impl WalkerConfig {
    /// Whether per-entry metadata has to be read while listing.
    pub(crate) fn needs_metadata(&self) -> bool {
        self.collect_size
            || self.collect_modified
            || matches!(self.sort, SortOrder::Size | SortOrder::Modified)
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            show_hidden: true,
            exclude_names: Vec::new(),
            exclude_extensions: Vec::new(),
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
            use_regex: false,
            ignore_file: None,
            sort: SortOrder::default(),
            ignore_case: true,
            collect_size: false,
            collect_modified: false,
        }
    }
}

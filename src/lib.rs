//! Recursivist - directory tree visualizer with filtering, export and
//! side-by-side comparison

pub mod compare;
pub mod error;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use compare::{Comparison, ComparisonFormatter, PatternInfo, compare_dirs, compare_trees};
pub use error::{Error, Result, WalkError};
pub use output::{ExportFormat, Exporter, OutputConfig, TreeFormatter, parse_json, to_json};
pub use tree::{SortOrder, TreeNode, Walker, WalkerConfig, build_tree};

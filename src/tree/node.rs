//! In-memory tree of filesystem entries

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// One filesystem entry and, for directories, its children in traversal order.
///
/// Serializes with a `type` tag (`"file"` / `"dir"`) and deserializes back to
/// an equal value, which is what the JSON export relies on for round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        name: String,
        #[serde(serialize_with = "serialize_lossy_path")]
        path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        modified: Option<DateTime<Utc>>,
    },
    Dir {
        name: String,
        #[serde(serialize_with = "serialize_lossy_path")]
        path: PathBuf,
        children: Vec<TreeNode>,
        /// Directory sits at the depth limit and was not descended.
        #[serde(default, skip_serializing_if = "is_false")]
        truncated: bool,
        /// Directory could not be read.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Paths are written as strings even when they are not valid UTF-8.
pub(crate) fn serialize_lossy_path<S: Serializer>(path: &Path, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&path.to_string_lossy())
}

impl TreeNode {
    pub fn dir(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        TreeNode::Dir {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
            truncated: false,
            error: None,
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        TreeNode::File {
            name: name.into(),
            path: path.into(),
            size: None,
            modified: None,
        }
    }

    /// Builder-style helper used mostly by tests.
    pub fn with_children(mut self, nodes: Vec<TreeNode>) -> Self {
        if let TreeNode::Dir { children, .. } = &mut self {
            *children = nodes;
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { name, .. } => name,
            TreeNode::Dir { name, .. } => name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TreeNode::File { path, .. } => path,
            TreeNode::Dir { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir { .. })
    }

    /// Children of a directory; always empty for files.
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::File { .. } => &[],
            TreeNode::Dir { children, .. } => children,
        }
    }

    /// Lowercased extension with its leading dot, e.g. `.rs`.
    pub fn extension(&self) -> Option<String> {
        match self {
            TreeNode::File { name, .. } => super::utils::extension_of(name),
            TreeNode::Dir { .. } => None,
        }
    }

    /// Number of non-directory entries below this node.
    pub fn file_count(&self) -> usize {
        match self {
            TreeNode::File { .. } => 1,
            TreeNode::Dir { children, .. } => children.iter().map(TreeNode::file_count).sum(),
        }
    }

    /// Number of directories below this node, not counting the node itself.
    pub fn dir_count(&self) -> usize {
        self.children()
            .iter()
            .filter(|c| c.is_dir())
            .map(|c| 1 + c.dir_count())
            .sum()
    }

    /// Drop directories that ended up with nothing to show.
    pub(crate) fn is_empty_dir(&self) -> bool {
        matches!(
            self,
            TreeNode::Dir { children, truncated: false, error: None, .. } if children.is_empty()
        )
    }
}

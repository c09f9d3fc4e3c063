//! Assembles a walk into a `TreeNode`

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::WalkError;

use super::node::TreeNode;
use super::walker::WalkEntry;

/// Directory still receiving children.
struct OpenDir {
    node: TreeNode,
    depth: usize,
    provisional: bool,
}

/// Consume a walk and assemble a single tree rooted at `root`.
///
/// Entries must arrive depth-first with each directory before its contents,
/// which is what [`Walk`](super::Walk) produces. Unreadable directories
/// become `error` annotations on their node.
pub fn build_tree<I>(root: &Path, entries: I) -> TreeNode
where
    I: IntoIterator<Item = Result<WalkEntry, WalkError>>,
{
    let mut stack = vec![OpenDir {
        node: TreeNode::dir(root_name(root), root),
        depth: 0,
        provisional: false,
    }];

    for item in entries {
        match item {
            Ok(entry) => {
                while stack.len() > 1 && stack.last().is_some_and(|d| d.depth >= entry.depth) {
                    close_top(&mut stack);
                }
                if entry.is_dir() {
                    let mut node = TreeNode::dir(entry.name, entry.path);
                    if let TreeNode::Dir { truncated, .. } = &mut node {
                        *truncated = entry.truncated;
                    }
                    stack.push(OpenDir {
                        node,
                        depth: entry.depth,
                        provisional: entry.provisional,
                    });
                } else {
                    let file = TreeNode::File {
                        name: entry.name,
                        path: entry.path,
                        size: entry.size,
                        modified: entry.modified.map(DateTime::<Utc>::from),
                    };
                    push_child(&mut stack, file);
                }
            }
            Err(err) => mark_unreadable(&mut stack, &err),
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack
        .pop()
        .map(|d| d.node)
        .unwrap_or_else(|| TreeNode::dir(root_name(root), root))
}

/// Display name of the walk root: its final component, resolved through
/// `canonicalize` so that `.` shows as the actual directory name.
pub fn root_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .or_else(|| root.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string())
}

fn push_child(stack: &mut [OpenDir], node: TreeNode) {
    if let Some(OpenDir {
        node: TreeNode::Dir { children, .. },
        ..
    }) = stack.last_mut()
    {
        children.push(node);
    }
}

fn close_top(stack: &mut Vec<OpenDir>) {
    let Some(done) = stack.pop() else {
        return;
    };
    if done.provisional && done.node.is_empty_dir() {
        return;
    }
    push_child(stack, done.node);
}

fn mark_unreadable(stack: &mut [OpenDir], err: &WalkError) {
    let target = stack
        .iter_mut()
        .rev()
        .find(|d| d.node.path() == err.path());
    if let Some(OpenDir {
        node: TreeNode::Dir { error, .. },
        ..
    }) = target
    {
        *error = Some(err.reason());
    }
}

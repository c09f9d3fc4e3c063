//! Shared utility functions for tree walking

use std::cmp::Ordering;
use std::path::Path;
use std::time::SystemTime;

use super::config::SortOrder;

/// Lowercased extension of a file name with its leading dot.
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Normalize a user-supplied extension to the `.ext` lowercase form.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Path of `path` relative to `root`, always using `/` separators.
pub fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// The fields entry ordering looks at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SortKey<'a> {
    pub name: &'a str,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
}

/// Total order over the entries of one directory.
pub(crate) fn compare_entries(
    a: &SortKey<'_>,
    b: &SortKey<'_>,
    order: SortOrder,
    ignore_case: bool,
) -> Ordering {
    let by_name = || compare_names(a.name, b.name, ignore_case);
    if order == SortOrder::Name {
        return by_name();
    }

    let dirs_first = b.is_dir.cmp(&a.is_dir);
    if dirs_first != Ordering::Equal || a.is_dir {
        return dirs_first.then_with(by_name);
    }

    let files = match order {
        SortOrder::Type => extension_of(a.name)
            .unwrap_or_default()
            .cmp(&extension_of(b.name).unwrap_or_default()),
        SortOrder::Size => b.size.cmp(&a.size),
        SortOrder::Modified => b.modified.cmp(&a.modified),
        SortOrder::Name => Ordering::Equal,
    };
    files.then_with(by_name)
}

fn compare_names(a: &str, b: &str, ignore_case: bool) -> Ordering {
    if ignore_case {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

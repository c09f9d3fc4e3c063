//! Walker - lazily lists the entries below a root directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ignore::gitignore::Gitignore;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result, WalkError};

use super::builder::build_tree;
use super::config::WalkerConfig;
use super::filter::{EntryFilter, Inclusion};
use super::node::TreeNode;
use super::utils::{SortKey, compare_entries, relative_path};

/// Kind of a walked entry. Symlinks are reported as files and never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry produced by a walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub name: String,
    /// 1 for direct children of the root.
    pub depth: usize,
    pub kind: EntryKind,
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    /// Directory at the depth limit that has content which was not listed.
    pub truncated: bool,
    /// Directory kept only to look for include-pattern matches below it.
    pub provisional: bool,
}

impl WalkEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Walks directories according to a [`WalkerConfig`].
#[derive(Debug)]
pub struct Walker {
    config: WalkerConfig,
    filter: EntryFilter,
}

impl Walker {
    /// Create a walker. Fails if any configured pattern does not compile.
    pub fn new(config: WalkerConfig) -> Result<Self> {
        let filter = EntryFilter::new(&config)?;
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Start a walk. The root is validated and read eagerly so that an
    /// unusable root fails here, before any entry is produced.
    pub fn walk(&self, root: &Path) -> Result<Walk<'_>> {
        let meta = fs::metadata(root).map_err(|e| Error::invalid_path(root, e))?;
        if !meta.is_dir() {
            return Err(Error::invalid_path(root, "not a directory"));
        }

        let mut walk = Walk {
            walker: self,
            root: root.to_path_buf(),
            stack: Vec::new(),
            pending: None,
        };
        let frame = walk
            .open(root, 1)
            .map_err(|e| Error::invalid_path(root, e))?;
        walk.stack.push(frame);
        debug!(root = %root.display(), "walk started");
        Ok(walk)
    }

    /// Walk `root` and assemble the result into a tree.
    pub fn build(&self, root: &Path) -> Result<TreeNode> {
        let walk = self.walk(root)?;
        Ok(build_tree(root, walk))
    }
}

/// Candidate entry of a directory listing, already filtered.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    name: String,
    is_dir: bool,
    size: Option<u64>,
    modified: Option<SystemTime>,
    provisional: bool,
}

/// Entries of one opened directory still to be yielded.
struct Frame {
    entries: std::vec::IntoIter<Candidate>,
    depth: usize,
    ignore: Option<Gitignore>,
}

/// Lazy depth-first iterator over a directory tree.
///
/// Each directory is yielded before its contents. A directory that cannot
/// be read is still yielded, followed by a [`WalkError`]; the walk then goes
/// on with its siblings.
pub struct Walk<'a> {
    walker: &'a Walker,
    root: PathBuf,
    stack: Vec<Frame>,
    /// Directory yielded last that still has to be descended.
    pending: Option<(PathBuf, usize)>,
}

impl Walk<'_> {
    /// List, filter and sort one directory whose entries sit at `depth`.
    fn open(&self, dir: &Path, depth: usize) -> std::io::Result<Frame> {
        let read = fs::read_dir(dir)?;
        let filter = &self.walker.filter;
        let config = &self.walker.config;

        let ignore = filter.load_ignore(dir);
        let mut ignores: Vec<&Gitignore> =
            self.stack.iter().filter_map(|f| f.ignore.as_ref()).collect();
        if let Some(gitignore) = ignore.as_ref() {
            ignores.push(gitignore);
        }

        let mut candidates = Vec::new();
        for entry in read {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    debug!(dir = %dir.display(), "skipping unreadable entry: {err}");
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    debug!(path = %entry.path().display(), "skipping entry without file type: {err}");
                    continue;
                }
            };

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = file_type.is_dir();
            let rel = relative_path(&path, &self.root);

            let provisional = match filter.classify(&path, &name, &rel, is_dir, &ignores) {
                Inclusion::Skip => {
                    trace!(path = %rel, "filtered out");
                    continue;
                }
                Inclusion::Keep => false,
                Inclusion::Provisional => true,
            };

            let (size, modified) = if config.needs_metadata() && !is_dir {
                match entry.metadata() {
                    Ok(meta) => (Some(meta.len()), meta.modified().ok()),
                    Err(err) => {
                        debug!(path = %rel, "metadata unavailable: {err}");
                        (None, None)
                    }
                }
            } else {
                (None, None)
            };

            candidates.push(Candidate {
                path,
                name,
                is_dir,
                size,
                modified,
                provisional,
            });
        }

        candidates.sort_by(|a, b| {
            compare_entries(&a.sort_key(), &b.sort_key(), config.sort, config.ignore_case)
        });

        Ok(Frame {
            entries: candidates.into_iter(),
            depth,
            ignore,
        })
    }
}

impl Candidate {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey {
            name: &self.name,
            is_dir: self.is_dir,
            size: self.size,
            modified: self.modified,
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = std::result::Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((dir, depth)) = self.pending.take() {
            match self.open(&dir, depth) {
                Ok(frame) => self.stack.push(frame),
                Err(source) => {
                    let err = WalkError::Unreadable { path: dir, source };
                    warn!("{err}");
                    return Some(Err(err));
                }
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let depth = frame.depth;
            let Some(candidate) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };

            let mut truncated = false;
            if candidate.is_dir {
                let at_limit = self
                    .walker
                    .config
                    .max_depth
                    .is_some_and(|max| depth >= max);
                if at_limit {
                    // Only content that would survive the filter counts.
                    truncated = self
                        .open(&candidate.path, depth + 1)
                        .is_ok_and(|below| !below.entries.as_slice().is_empty());
                } else {
                    self.pending = Some((candidate.path.clone(), depth + 1));
                }
            }

            return Some(Ok(WalkEntry {
                path: candidate.path,
                name: candidate.name,
                depth,
                kind: if candidate.is_dir {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
                size: candidate.size,
                modified: candidate.modified,
                truncated,
                provisional: candidate.provisional,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/c.txt"), "c").unwrap();
        dir
    }

    fn names(walker: &Walker, root: &Path) -> Vec<(String, usize)> {
        walker
            .walk(root)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| (e.name, e.depth))
            .collect()
    }

    #[test]
    fn test_walk_order_and_depths() {
        let dir = setup();
        let walker = Walker::new(WalkerConfig::default()).unwrap();
        assert_eq!(
            names(&walker, dir.path()),
            vec![
                ("b".to_string(), 1),
                ("c.txt".to_string(), 2),
                ("a.txt".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_depth_limit_marks_truncated() {
        let dir = setup();
        let walker = Walker::new(WalkerConfig {
            max_depth: Some(1),
            ..Default::default()
        })
        .unwrap();
        let entries: Vec<_> = walker.walk(dir.path()).unwrap().filter_map(|e| e.ok()).collect();
        assert_eq!(entries.len(), 2);
        let b = entries.iter().find(|e| e.name == "b").unwrap();
        assert!(b.is_dir());
        assert!(b.truncated);
    }

    #[test]
    fn test_empty_dir_at_limit_is_not_truncated() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        let walker = Walker::new(WalkerConfig {
            max_depth: Some(1),
            ..Default::default()
        })
        .unwrap();
        let entry = walker.walk(dir.path()).unwrap().next().unwrap().unwrap();
        assert!(!entry.truncated);
    }

    #[test]
    fn test_filtered_content_at_limit_is_not_truncated() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/.hidden"), "").unwrap();
        let walker = Walker::new(WalkerConfig {
            max_depth: Some(1),
            show_hidden: false,
            ..Default::default()
        })
        .unwrap();
        let entry = walker.walk(dir.path()).unwrap().next().unwrap().unwrap();
        assert_eq!(entry.name, "b");
        assert!(!entry.truncated);
    }

    #[test]
    fn test_missing_root_is_invalid_path() {
        let dir = TempDir::new().unwrap();
        let walker = Walker::new(WalkerConfig::default()).unwrap();
        let err = walker.walk(&dir.path().join("missing")).err().unwrap();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn test_file_root_is_invalid_path() {
        let dir = setup();
        let walker = Walker::new(WalkerConfig::default()).unwrap();
        let err = walker.walk(&dir.path().join("a.txt")).err().unwrap();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn test_collects_size_when_requested() {
        let dir = setup();
        let walker = Walker::new(WalkerConfig {
            collect_size: true,
            ..Default::default()
        })
        .unwrap();
        let a = walker
            .walk(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.name == "a.txt")
            .unwrap();
        assert_eq!(a.size, Some(1));
    }

    #[test]
    fn test_nested_ignore_files_apply_to_subtree() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/.gitignore"), "*.tmp\n").unwrap();
        fs::write(dir.path().join("sub/x.log"), "").unwrap();
        fs::write(dir.path().join("sub/x.tmp"), "").unwrap();
        fs::write(dir.path().join("sub/x.rs"), "").unwrap();
        fs::write(dir.path().join("y.tmp"), "").unwrap();

        let walker = Walker::new(WalkerConfig {
            ignore_file: Some(".gitignore".to_string()),
            ..Default::default()
        })
        .unwrap();
        let found: Vec<String> = names(&walker, dir.path()).into_iter().map(|(n, _)| n).collect();

        assert!(found.contains(&"x.rs".to_string()));
        assert!(found.contains(&"y.tmp".to_string()), "sub rules must not leak upward");
        assert!(!found.contains(&"x.log".to_string()));
        assert!(!found.contains(&"x.tmp".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let dir = setup();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
        let walker = Walker::new(WalkerConfig::default()).unwrap();
        let entries: Vec<_> = walker.walk(dir.path()).unwrap().filter_map(|e| e.ok()).collect();
        let link = entries.iter().find(|e| e.name == "loop").unwrap();
        assert_eq!(link.kind, EntryKind::File);
        assert_eq!(entries.len(), 4);
    }
}

//! Entry filtering for tree walking

use std::collections::HashSet;
use std::path::Path;

use glob::Pattern;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::config::WalkerConfig;
use super::utils::{extension_of, normalize_extension};

/// A compiled exclude/include pattern.
#[derive(Debug)]
enum Matcher {
    Glob(Pattern),
    Regex(Regex),
}

impl Matcher {
    fn compile(pattern: &str, use_regex: bool) -> Result<Self> {
        if use_regex {
            Regex::new(pattern)
                .map(Matcher::Regex)
                .map_err(|e| Error::pattern(pattern, e))
        } else {
            Pattern::new(pattern)
                .map(Matcher::Glob)
                .map_err(|e| Error::pattern(pattern, e.msg))
        }
    }

    /// Matches against either the bare name or the root-relative path.
    fn matches(&self, name: &str, rel_path: &str) -> bool {
        match self {
            Matcher::Glob(p) => p.matches(name) || p.matches(rel_path),
            Matcher::Regex(r) => r.is_match(name) || r.is_match(rel_path),
        }
    }
}

/// Outcome of filtering one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Keep,
    /// Directory kept only so that include patterns can match below it.
    /// Dropped later if nothing below it survives.
    Provisional,
    Skip,
}

/// Decides which directory entries make it into the tree.
#[derive(Debug)]
pub struct EntryFilter {
    show_hidden: bool,
    exclude_names: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude: Vec<Matcher>,
    include: Vec<Matcher>,
    ignore_file: Option<String>,
}

impl EntryFilter {
    /// Compile the filter; invalid patterns are reported here, before any walking.
    pub fn new(config: &WalkerConfig) -> Result<Self> {
        let compile = |patterns: &[String]| -> Result<Vec<Matcher>> {
            patterns
                .iter()
                .map(|p| Matcher::compile(p, config.use_regex))
                .collect()
        };

        Ok(Self {
            show_hidden: config.show_hidden,
            exclude_names: config.exclude_names.iter().cloned().collect(),
            exclude_extensions: config
                .exclude_extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            exclude: compile(&config.exclude_patterns)?,
            include: compile(&config.include_patterns)?,
            ignore_file: config.ignore_file.clone(),
        })
    }

    /// Load the ignore file of `dir`, if one is configured and present.
    pub fn load_ignore(&self, dir: &Path) -> Option<Gitignore> {
        let file_name = self.ignore_file.as_ref()?;
        let file = dir.join(file_name);
        if !file.is_file() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(dir);
        if let Some(err) = builder.add(&file) {
            warn!(file = %file.display(), "skipping malformed ignore rules: {err}");
        }
        match builder.build() {
            Ok(gitignore) => {
                debug!(file = %file.display(), rules = gitignore.num_ignores(), "loaded ignore file");
                Some(gitignore)
            }
            Err(err) => {
                warn!(file = %file.display(), "cannot use ignore file: {err}");
                None
            }
        }
    }

    /// Classify one entry. `ignores` holds the ignore rules in effect,
    /// outermost directory first.
    pub fn classify(
        &self,
        path: &Path,
        name: &str,
        rel_path: &str,
        is_dir: bool,
        ignores: &[&Gitignore],
    ) -> Inclusion {
        if self.include.iter().any(|m| m.matches(name, rel_path)) {
            return Inclusion::Keep;
        }

        if !self.show_hidden && name.starts_with('.') {
            return Inclusion::Skip;
        }
        if self.exclude_names.contains(name) {
            return Inclusion::Skip;
        }
        if !is_dir
            && extension_of(name).is_some_and(|ext| self.exclude_extensions.contains(&ext))
        {
            return Inclusion::Skip;
        }
        if self.exclude.iter().any(|m| m.matches(name, rel_path)) {
            return Inclusion::Skip;
        }
        if is_ignored(path, is_dir, ignores) {
            return Inclusion::Skip;
        }

        if self.include.is_empty() {
            Inclusion::Keep
        } else if is_dir {
            Inclusion::Provisional
        } else {
            Inclusion::Skip
        }
    }
}

/// Deepest matching rule wins; `!pattern` whitelists.
fn is_ignored(path: &Path, is_dir: bool, ignores: &[&Gitignore]) -> bool {
    for gitignore in ignores.iter().rev() {
        let m = gitignore.matched(path, is_dir);
        if m.is_ignore() {
            return true;
        }
        if m.is_whitelist() {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn filter(config: WalkerConfig) -> EntryFilter {
        EntryFilter::new(&config).unwrap()
    }

    fn classify(f: &EntryFilter, rel: &str, is_dir: bool) -> Inclusion {
        let name = rel.rsplit('/').next().unwrap();
        f.classify(Path::new(rel), name, rel, is_dir, &[])
    }

    #[test]
    fn test_default_keeps_everything() {
        let f = filter(WalkerConfig::default());
        assert_eq!(classify(&f, ".env", false), Inclusion::Keep);
        assert_eq!(classify(&f, "src", true), Inclusion::Keep);
    }

    #[test]
    fn test_hidden_policy() {
        let f = filter(WalkerConfig {
            show_hidden: false,
            ..Default::default()
        });
        assert_eq!(classify(&f, ".env", false), Inclusion::Skip);
        assert_eq!(classify(&f, ".git", true), Inclusion::Skip);
        assert_eq!(classify(&f, "env", false), Inclusion::Keep);
    }

    #[test]
    fn test_exclude_names_and_extensions() {
        let f = filter(WalkerConfig {
            exclude_names: vec!["node_modules".to_string()],
            exclude_extensions: vec!["PYC".to_string(), ".log".to_string()],
            ..Default::default()
        });
        assert_eq!(classify(&f, "node_modules", true), Inclusion::Skip);
        assert_eq!(classify(&f, "cache.pyc", false), Inclusion::Skip);
        assert_eq!(classify(&f, "APP.LOG", false), Inclusion::Skip);
        assert_eq!(classify(&f, "main.py", false), Inclusion::Keep);
        // extensions only apply to files
        assert_eq!(classify(&f, "dir.log", true), Inclusion::Keep);
    }

    #[test]
    fn test_glob_patterns() {
        let f = filter(WalkerConfig {
            exclude_patterns: vec!["*.tmp".to_string(), "build/*".to_string()],
            ..Default::default()
        });
        assert_eq!(classify(&f, "a.tmp", false), Inclusion::Skip);
        assert_eq!(classify(&f, "build/out.o", false), Inclusion::Skip);
        assert_eq!(classify(&f, "src/out.o", false), Inclusion::Keep);
    }

    #[test]
    fn test_regex_patterns() {
        let f = filter(WalkerConfig {
            exclude_patterns: vec![r"^test_.*\.py$".to_string()],
            use_regex: true,
            ..Default::default()
        });
        assert_eq!(classify(&f, "test_core.py", false), Inclusion::Skip);
        assert_eq!(classify(&f, "core.py", false), Inclusion::Keep);
    }

    #[test]
    fn test_include_overrides_exclude() {
        let f = filter(WalkerConfig {
            exclude_extensions: vec!["md".to_string()],
            include_patterns: vec!["README.md".to_string()],
            ..Default::default()
        });
        assert_eq!(classify(&f, "README.md", false), Inclusion::Keep);
        assert_eq!(classify(&f, "NOTES.md", false), Inclusion::Skip);
        assert_eq!(classify(&f, "main.rs", false), Inclusion::Skip);
        assert_eq!(classify(&f, "docs", true), Inclusion::Provisional);
    }

    #[test]
    fn test_invalid_patterns_are_errors() {
        let glob = EntryFilter::new(&WalkerConfig {
            exclude_patterns: vec!["[".to_string()],
            ..Default::default()
        });
        assert!(matches!(glob, Err(Error::Pattern { .. })));

        let regex = EntryFilter::new(&WalkerConfig {
            include_patterns: vec!["(".to_string()],
            use_regex: true,
            ..Default::default()
        });
        assert!(matches!(regex, Err(Error::Pattern { .. })));
    }

    #[test]
    fn test_ignore_file_rules() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n!keep.log\nnode_modules/\n").unwrap();

        let f = filter(WalkerConfig {
            ignore_file: Some(".gitignore".to_string()),
            ..Default::default()
        });
        let gitignore = f.load_ignore(dir.path()).expect("ignore file should load");
        let ignores = [&gitignore];

        let check = |name: &str, is_dir: bool| {
            f.classify(&dir.path().join(name), name, name, is_dir, &ignores)
        };
        assert_eq!(check("app.log", false), Inclusion::Skip);
        assert_eq!(check("keep.log", false), Inclusion::Keep);
        assert_eq!(check("node_modules", true), Inclusion::Skip);
        assert_eq!(check("main.rs", false), Inclusion::Keep);
    }

    #[test]
    fn test_missing_ignore_file() {
        let dir = TempDir::new().unwrap();
        let f = filter(WalkerConfig {
            ignore_file: Some(".gitignore".to_string()),
            ..Default::default()
        });
        assert!(f.load_ignore(dir.path()).is_none());
    }
}

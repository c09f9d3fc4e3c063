//! Side-by-side comparison of two directory trees
//!
//! Both roots are walked with the same [`Walker`], then each side is
//! checked against the other: an entry is unique when no entry with the
//! same name and kind sits at the same position on the other side. Everything
//! below a unique directory is unique as well.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::debug;

use crate::error::{Error, Result};
use crate::output::{
    ExportFormat, HTML_STYLE, HtmlFormatter, OutputConfig, TreeLine, html_escape, layout, pad_right,
    summary,
};
use crate::tree::{TreeNode, Walker, WalkerConfig, serialize_lossy_path};

/// Patterns that were applied to both sides, carried into exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternInfo {
    pub exclude_patterns: Vec<String>,
    pub include_patterns: Vec<String>,
    pub pattern_type: String,
}

impl PatternInfo {
    pub fn from_config(config: &WalkerConfig) -> Self {
        Self {
            exclude_patterns: config.exclude_patterns.clone(),
            include_patterns: config.include_patterns.clone(),
            pattern_type: if config.use_regex { "regex" } else { "glob" }.to_string(),
        }
    }

    fn is_empty(&self) -> bool {
        self.exclude_patterns.is_empty() && self.include_patterns.is_empty()
    }
}

/// Two trees and the relative paths that exist on only one side.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub left: TreeNode,
    pub right: TreeNode,
    pub patterns: PatternInfo,
    left_unique: HashSet<String>,
    right_unique: HashSet<String>,
}

impl Comparison {
    pub fn left_path(&self) -> &Path {
        self.left.path()
    }

    pub fn right_path(&self) -> &Path {
        self.right.path()
    }

    /// `/`-separated paths, relative to the left root, missing on the right.
    pub fn left_unique(&self) -> &HashSet<String> {
        &self.left_unique
    }

    pub fn right_unique(&self) -> &HashSet<String> {
        &self.right_unique
    }

    pub fn is_identical(&self) -> bool {
        self.left_unique.is_empty() && self.right_unique.is_empty()
    }

    pub fn with_patterns(mut self, patterns: PatternInfo) -> Self {
        self.patterns = patterns;
        self
    }
}

/// Compare two already built trees.
pub fn compare_trees(left: TreeNode, right: TreeNode) -> Comparison {
    let mut left_unique = HashSet::new();
    let mut right_unique = HashSet::new();
    collect_unique(&left, Some(&right), "", &mut left_unique);
    collect_unique(&right, Some(&left), "", &mut right_unique);
    debug!(
        left = left_unique.len(),
        right = right_unique.len(),
        "comparison computed"
    );

    Comparison {
        left,
        right,
        patterns: PatternInfo::default(),
        left_unique,
        right_unique,
    }
}

/// Walk both roots with `walker` and compare the results.
pub fn compare_dirs(walker: &Walker, left: &Path, right: &Path) -> Result<Comparison> {
    let left_tree = walker.build(left)?;
    let right_tree = walker.build(right)?;
    let patterns = PatternInfo::from_config(walker.config());
    Ok(compare_trees(left_tree, right_tree).with_patterns(patterns))
}

fn collect_unique(
    node: &TreeNode,
    other: Option<&TreeNode>,
    rel: &str,
    out: &mut HashSet<String>,
) {
    for child in node.children() {
        let child_rel = if rel.is_empty() {
            child.name().to_string()
        } else {
            format!("{}/{}", rel, child.name())
        };
        let counterpart = other.and_then(|o| {
            o.children()
                .iter()
                .find(|c| c.name() == child.name() && c.is_dir() == child.is_dir())
        });
        if counterpart.is_none() {
            out.insert(child_rel.clone());
        }
        if child.is_dir() {
            collect_unique(child, counterpart, &child_rel, out);
        }
    }
}

/// One line of a comparison column.
struct Cell {
    line: TreeLine,
    unique: bool,
}

impl Cell {
    /// Text without styling. Unique entries get a ` *` marker when `marked`.
    fn text(&self, marked: bool) -> String {
        let mut text = self.line.plain();
        if marked && self.unique {
            text.push_str(" *");
        }
        text
    }

    fn width(&self, marked: bool) -> usize {
        self.text(marked).chars().count()
    }
}

/// Renders a [`Comparison`] for the console and for export files.
pub struct ComparisonFormatter {
    config: OutputConfig,
}

impl ComparisonFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    fn column(&self, tree: &TreeNode, unique: &HashSet<String>) -> Vec<Cell> {
        layout(tree, &self.config)
            .into_iter()
            .map(|line| Cell {
                unique: unique.contains(&line.rel_path),
                line,
            })
            .collect()
    }

    fn columns(&self, cmp: &Comparison) -> (Vec<Cell>, Vec<Cell>) {
        (
            self.column(&cmp.left, &cmp.left_unique),
            self.column(&cmp.right, &cmp.right_unique),
        )
    }

    /// Write the comparison to a color-capable writer.
    pub fn write<W: WriteColor>(&self, out: &mut W, cmp: &Comparison) -> io::Result<()> {
        let color = self.config.use_color;
        let marked = !color;
        let (left, right) = self.columns(cmp);
        let left_header = format!("Left: {}", cmp.left_path().display());
        let width = left
            .iter()
            .map(|c| c.width(marked))
            .chain(std::iter::once(left_header.chars().count()))
            .max()
            .unwrap_or(0);

        if color {
            write!(out, "Legend: ")?;
            out.set_color(ColorSpec::new().set_bg(Some(Color::Green)))?;
            write!(out, "only in left")?;
            out.reset()?;
            write!(out, "  ")?;
            out.set_color(ColorSpec::new().set_bg(Some(Color::Red)))?;
            write!(out, "only in right")?;
            out.reset()?;
            writeln!(out)?;
        } else {
            writeln!(out, "Legend: * = only in this directory")?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "{} │ Right: {}",
            pad_right(&left_header, width),
            cmp.right_path().display()
        )?;

        for i in 0..left.len().max(right.len()) {
            let used = match left.get(i) {
                Some(cell) => {
                    self.write_cell(out, cell, Color::Green)?;
                    cell.width(marked)
                }
                None => 0,
            };
            write!(out, "{} │ ", " ".repeat(width - used))?;
            if let Some(cell) = right.get(i) {
                self.write_cell(out, cell, Color::Red)?;
            }
            writeln!(out)?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "{} │ {}",
            pad_right(&summary(&cmp.left), width),
            summary(&cmp.right)
        )?;
        Ok(())
    }

    fn write_cell<W: WriteColor>(
        &self,
        out: &mut W,
        cell: &Cell,
        highlight: Color,
    ) -> io::Result<()> {
        if self.config.use_color {
            cell.line
                .write_colored(out, cell.unique.then_some(highlight))
        } else {
            write!(out, "{}", cell.text(true))
        }
    }

    pub fn print(&self, cmp: &Comparison) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write(&mut stdout, cmp)?;
        stdout.flush()
    }

    /// Render the comparison for export. Markdown has no side-by-side layout
    /// and is rejected.
    pub fn render(&self, cmp: &Comparison, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Txt => Ok(self.format_text(cmp)),
            ExportFormat::Html => Ok(self.format_html(cmp)),
            ExportFormat::Json => comparison_json(cmp),
            ExportFormat::Md => Err(Error::UnsupportedExportFormat(format!(
                "{} (not available for comparisons)",
                format
            ))),
        }
    }

    /// Plain two-column text with a header describing both sides.
    pub fn format_text(&self, cmp: &Comparison) -> String {
        let rule = "=".repeat(80);
        let (left, right) = self.columns(cmp);
        let width = left.iter().map(|c| c.width(true)).max().unwrap_or(0);

        let mut out = String::new();
        out.push_str("Directory Comparison\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Left:  {}\n", cmp.left_path().display()));
        out.push_str(&format!("Right: {}\n", cmp.right_path().display()));
        if !cmp.patterns.is_empty() {
            out.push_str(&format!("Pattern type: {}\n", cmp.patterns.pattern_type));
            if !cmp.patterns.exclude_patterns.is_empty() {
                out.push_str(&format!(
                    "Exclude patterns: {}\n",
                    cmp.patterns.exclude_patterns.join(", ")
                ));
            }
            if !cmp.patterns.include_patterns.is_empty() {
                out.push_str(&format!(
                    "Include patterns: {}\n",
                    cmp.patterns.include_patterns.join(", ")
                ));
            }
        }
        out.push_str(&rule);
        out.push_str("\n\n");

        for i in 0..left.len().max(right.len()) {
            let l = left.get(i).map(|c| c.text(true)).unwrap_or_default();
            let r = right.get(i).map(|c| c.text(true)).unwrap_or_default();
            let row = format!("{} | {}", pad_right(&l, width), r);
            out.push_str(row.trim_end());
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&format!(
            "Left:  {} ({} unique)\n",
            summary(&cmp.left),
            cmp.left_unique.len()
        ));
        out.push_str(&format!(
            "Right: {} ({} unique)\n",
            summary(&cmp.right),
            cmp.right_unique.len()
        ));
        out.push_str("Legend: * = only in this directory\n");
        out
    }

    /// Standalone HTML page with the two trees in adjacent columns.
    pub fn format_html(&self, cmp: &Comparison) -> String {
        let html = HtmlFormatter::new(self.config.for_export());
        let mut columns = String::new();
        for (class, tree, unique) in [
            ("left", &cmp.left, &cmp.left_unique),
            ("right", &cmp.right, &cmp.right_unique),
        ] {
            columns.push_str(&format!("        <div class=\"column {}\">\n", class));
            columns.push_str(&format!(
                "            <h2>📂 {}</h2>\n",
                html_escape(&tree.path().display().to_string())
            ));
            html.format_list(tree, 3, "", &|rel: &str| unique.contains(rel), &mut columns);
            columns.push_str(&format!(
                "            <p class=\"meta\">{}</p>\n",
                summary(tree)
            ));
            columns.push_str("        </div>\n");
        }

        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n",
                "<head>\n",
                "    <meta charset=\"utf-8\">\n",
                "    <title>Directory Comparison - {left} vs {right}</title>\n",
                "    <style>\n{style}",
                "        .container {{\n",
                "            display: flex;\n",
                "            gap: 20px;\n",
                "        }}\n",
                "        .column {{\n",
                "            flex: 1;\n",
                "            overflow-x: auto;\n",
                "        }}\n",
                "        .left .unique {{\n",
                "            background-color: #d5f5e3;\n",
                "        }}\n",
                "        .right .unique {{\n",
                "            background-color: #fadbd8;\n",
                "        }}\n",
                "    </style>\n",
                "</head>\n",
                "<body>\n",
                "    <h1>Directory Comparison</h1>\n",
                "    <p class=\"meta\">Highlighted entries exist in only one directory.</p>\n",
                "    <div class=\"container\">\n",
                "{columns}",
                "    </div>\n",
                "</body>\n",
                "</html>\n",
            ),
            left = html_escape(cmp.left.name()),
            right = html_escape(cmp.right.name()),
            style = HTML_STYLE,
            columns = columns,
        )
    }
}

#[derive(Serialize)]
struct ComparisonDocument<'a> {
    left: SideDocument<'a>,
    right: SideDocument<'a>,
    metadata: &'a PatternInfo,
}

#[derive(Serialize)]
struct SideDocument<'a> {
    #[serde(serialize_with = "serialize_lossy_path")]
    path: &'a Path,
    tree: &'a TreeNode,
    unique: Vec<&'a str>,
}

impl<'a> SideDocument<'a> {
    fn new(tree: &'a TreeNode, unique: &'a HashSet<String>) -> Self {
        let mut unique: Vec<&str> = unique.iter().map(String::as_str).collect();
        unique.sort_unstable();
        Self {
            path: tree.path(),
            tree,
            unique,
        }
    }
}

fn comparison_json(cmp: &Comparison) -> Result<String> {
    let doc = ComparisonDocument {
        left: SideDocument::new(&cmp.left, &cmp.left_unique),
        right: SideDocument::new(&cmp.right, &cmp.right_unique),
        metadata: &cmp.patterns,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use termcolor::{Buffer, NoColor};

    use super::*;
    use crate::test_utils::TestDir;

    fn left() -> TreeNode {
        TreeNode::dir("left", "left").with_children(vec![
            TreeNode::dir("src", "left/src").with_children(vec![
                TreeNode::file("lib.rs", "left/src/lib.rs"),
                TreeNode::file("old.rs", "left/src/old.rs"),
            ]),
            TreeNode::dir("docs", "left/docs")
                .with_children(vec![TreeNode::file("guide.md", "left/docs/guide.md")]),
            TreeNode::file("README.md", "left/README.md"),
        ])
    }

    fn right() -> TreeNode {
        TreeNode::dir("right", "right").with_children(vec![
            TreeNode::dir("src", "right/src").with_children(vec![
                TreeNode::file("lib.rs", "right/src/lib.rs"),
                TreeNode::file("new.rs", "right/src/new.rs"),
            ]),
            TreeNode::file("README.md", "right/README.md"),
            TreeNode::file("docs", "right/docs"),
        ])
    }

    fn plain() -> OutputConfig {
        OutputConfig {
            use_color: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_unique_entries() {
        let cmp = compare_trees(left(), right());

        let left_unique: HashSet<String> = ["src/old.rs", "docs", "docs/guide.md"]
            .into_iter()
            .map(String::from)
            .collect();
        let right_unique: HashSet<String> =
            ["src/new.rs", "docs"].into_iter().map(String::from).collect();
        assert_eq!(cmp.left_unique(), &left_unique);
        assert_eq!(cmp.right_unique(), &right_unique);
        assert!(!cmp.is_identical());
    }

    #[test]
    fn test_identical_trees() {
        let cmp = compare_trees(left(), left());
        assert!(cmp.is_identical());
    }

    #[test]
    fn test_plain_console_marks_unique() {
        let cmp = compare_trees(left(), right());
        let mut out = NoColor::new(Vec::new());
        ComparisonFormatter::new(plain()).write(&mut out, &cmp).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert!(text.starts_with("Legend: * = only in this directory\n"));
        assert!(text.contains("📄 old.rs *"));
        assert!(text.contains("📄 new.rs *"));
        assert!(!text.contains("lib.rs *"));
        assert!(!text.contains("\x1b["));
        assert!(
            text.lines()
                .skip(2)
                .filter(|l| !l.is_empty())
                .all(|l| l.contains(" │ "))
        );
    }

    #[test]
    fn test_colored_console_highlights() {
        let cmp = compare_trees(left(), right());
        let mut out = Buffer::ansi();
        ComparisonFormatter::new(OutputConfig::default())
            .write(&mut out, &cmp)
            .unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("\x1b["));
        assert!(!text.contains("old.rs *"));
    }

    #[test]
    fn test_text_export_columns_align() {
        let cmp = compare_trees(left(), right()).with_patterns(PatternInfo {
            exclude_patterns: vec!["*.log".to_string()],
            include_patterns: vec![],
            pattern_type: "glob".to_string(),
        });
        let text = ComparisonFormatter::new(plain()).format_text(&cmp);

        assert!(text.contains("Left:  left\n"));
        assert!(text.contains("Right: right\n"));
        assert!(text.contains("Exclude patterns: *.log\n"));
        assert!(!text.contains("Include patterns"));

        let rows: Vec<&str> = text.lines().filter(|l| l.contains(" | ")).collect();
        let offsets: HashSet<usize> = rows
            .iter()
            .map(|l| l.split(" | ").next().unwrap().chars().count())
            .collect();
        assert_eq!(offsets.len(), 1, "separator should sit in one column");
        assert!(text.contains("(3 unique)"));
    }

    #[test]
    fn test_html_export_marks_unique() {
        let cmp = compare_trees(left(), right());
        let html = ComparisonFormatter::new(plain()).format_html(&cmp);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"column left\">"));
        assert!(html.contains("<div class=\"column right\">"));
        assert!(html.contains("<li class=\"file unique\"><span style=\"color: "));
        assert!(html.contains("<li class=\"directory unique\">📁 docs"));
        assert_eq!(html.matches(" unique\"").count(), 5);
    }

    #[test]
    fn test_json_export_carries_metadata() {
        let cmp = compare_trees(left(), right()).with_patterns(PatternInfo {
            exclude_patterns: vec![],
            include_patterns: vec!["^src".to_string()],
            pattern_type: "regex".to_string(),
        });
        let json = ComparisonFormatter::new(plain())
            .render(&cmp, ExportFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["pattern_type"], "regex");
        assert_eq!(value["metadata"]["include_patterns"][0], "^src");
        assert_eq!(value["left"]["tree"]["type"], "dir");
        assert_eq!(value["right"]["unique"][0], "docs");
        assert_eq!(value["right"]["unique"][1], "src/new.rs");
    }

    #[test]
    fn test_markdown_rejected() {
        let cmp = compare_trees(left(), right());
        let err = ComparisonFormatter::new(plain())
            .render(&cmp, ExportFormat::Md)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedExportFormat(_)));
    }

    #[test]
    fn test_compare_dirs_walks_both_roots() {
        let a = TestDir::new();
        a.add_file("shared.txt", "x");
        a.add_file("only_a.txt", "a");
        let b = TestDir::new();
        b.add_file("shared.txt", "x");
        b.add_file("only_b.txt", "b");

        let walker = Walker::new(WalkerConfig {
            exclude_patterns: vec!["*.tmp".to_string()],
            ..Default::default()
        })
        .unwrap();
        let cmp = compare_dirs(&walker, a.path(), b.path()).unwrap();
        assert!(cmp.left_unique().contains("only_a.txt"));
        assert!(cmp.right_unique().contains("only_b.txt"));
        assert!(!cmp.left_unique().contains("shared.txt"));
        assert_eq!(cmp.patterns.exclude_patterns, vec!["*.tmp".to_string()]);
        assert_eq!(cmp.patterns.pattern_type, "glob");
    }

    #[test]
    fn test_compare_dirs_rejects_missing_side() {
        let a = TestDir::new();
        let walker = Walker::new(WalkerConfig::default()).unwrap();
        let missing = a.path().join("nope");
        assert!(matches!(
            compare_dirs(&walker, a.path(), &missing),
            Err(Error::InvalidPath { .. })
        ));
    }
}

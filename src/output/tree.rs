//! Tree formatter for console and plain-text output
//!
//! The tree is first laid out into [`TreeLine`]s (prefix, label, details),
//! which are then written either plain or with colors. The comparison view
//! reuses the same layout to place two trees side by side.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::{TreeNode, format_size};

use super::config::OutputConfig;
use super::utils::{connector, continuation_prefix, extension_color, format_modified};

pub const TRUNCATED_MARKER: &str = "⋯ (max depth reached)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Root,
    Dir,
    File,
    /// Placeholder below a directory that was not descended.
    Truncated,
}

/// One rendered line of a tree.
#[derive(Debug, Clone)]
pub struct TreeLine {
    /// Ancestry prefix plus connector.
    pub prefix: String,
    pub kind: LineKind,
    /// Icon and name.
    pub label: String,
    pub details: Vec<String>,
    pub annotation: Option<String>,
    pub extension: Option<String>,
    /// Name-based path relative to the root, `/`-separated.
    pub rel_path: String,
}

impl TreeLine {
    /// The line without any styling.
    pub fn plain(&self) -> String {
        let mut line = format!("{}{}", self.prefix, self.label);
        for detail in &self.details {
            line.push_str("  ");
            line.push_str(detail);
        }
        if let Some(note) = &self.annotation {
            line.push(' ');
            line.push_str(note);
        }
        line
    }

    /// Write the line with colors, without a trailing newline. `highlight`
    /// sets a background on the label.
    pub fn write_colored<W: WriteColor + ?Sized>(
        &self,
        out: &mut W,
        highlight: Option<Color>,
    ) -> io::Result<()> {
        write!(out, "{}", self.prefix)?;

        let mut spec = ColorSpec::new();
        match self.kind {
            LineKind::Root | LineKind::Dir => {
                spec.set_fg(Some(Color::Blue)).set_bold(true);
            }
            LineKind::File => {
                spec.set_fg(Some(extension_color(self.extension.as_deref())));
            }
            LineKind::Truncated => {
                spec.set_dimmed(true);
            }
        }
        if let Some(bg) = highlight {
            spec.set_bg(Some(bg));
        }
        out.set_color(&spec)?;
        write!(out, "{}", self.label)?;
        out.reset()?;

        for (i, detail) in self.details.iter().enumerate() {
            write!(out, "  ")?;
            // size first, then timestamp
            let color = if i == 0 && detail.starts_with('[') {
                Color::Green
            } else {
                Color::Cyan
            };
            out.set_color(ColorSpec::new().set_fg(Some(color)))?;
            write!(out, "{}", detail)?;
            out.reset()?;
        }

        if let Some(note) = &self.annotation {
            write!(out, " ")?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(out, "{}", note)?;
            out.reset()?;
        }
        Ok(())
    }
}

/// Lay out a tree into lines, root first.
pub fn layout(node: &TreeNode, config: &OutputConfig) -> Vec<TreeLine> {
    let mut lines = vec![TreeLine {
        prefix: String::new(),
        kind: LineKind::Root,
        label: if config.icons {
            format!("📂 {}", display_name(node, config))
        } else {
            display_name(node, config)
        },
        details: Vec::new(),
        annotation: dir_annotation(node),
        extension: None,
        rel_path: String::new(),
    }];
    layout_children(node, "", "", config, &mut lines);
    lines
}

fn layout_children(
    node: &TreeNode,
    prefix: &str,
    rel: &str,
    config: &OutputConfig,
    lines: &mut Vec<TreeLine>,
) {
    let TreeNode::Dir {
        children,
        truncated,
        ..
    } = node
    else {
        return;
    };

    if *truncated && children.is_empty() {
        lines.push(TreeLine {
            prefix: format!("{}{}", prefix, connector(true)),
            kind: LineKind::Truncated,
            label: TRUNCATED_MARKER.to_string(),
            details: Vec::new(),
            annotation: None,
            extension: None,
            rel_path: String::new(),
        });
        return;
    }

    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let child_rel = if rel.is_empty() {
            child.name().to_string()
        } else {
            format!("{}/{}", rel, child.name())
        };
        let line_prefix = format!("{}{}", prefix, connector(is_last));

        match child {
            TreeNode::File { size, modified, .. } => {
                let mut details = Vec::new();
                if config.show_size {
                    if let Some(bytes) = size {
                        details.push(format!("[{}]", format_size(*bytes)));
                    }
                }
                if config.show_modified {
                    if let Some(time) = modified {
                        details.push(format_modified(time));
                    }
                }
                let name = display_name(child, config);
                lines.push(TreeLine {
                    prefix: line_prefix,
                    kind: LineKind::File,
                    label: if config.icons {
                        format!("📄 {}", name)
                    } else {
                        name
                    },
                    details,
                    annotation: None,
                    extension: child.extension(),
                    rel_path: child_rel,
                });
            }
            TreeNode::Dir { .. } => {
                let name = display_name(child, config);
                lines.push(TreeLine {
                    prefix: line_prefix,
                    kind: LineKind::Dir,
                    label: if config.icons {
                        format!("📁 {}", name)
                    } else {
                        format!("{}/", name)
                    },
                    details: Vec::new(),
                    annotation: dir_annotation(child),
                    extension: None,
                    rel_path: child_rel.clone(),
                });
                let next_prefix = continuation_prefix(prefix, is_last);
                layout_children(child, &next_prefix, &child_rel, config, lines);
            }
        }
    }
}

fn display_name(node: &TreeNode, config: &OutputConfig) -> String {
    if config.full_path {
        node.path().display().to_string()
    } else {
        node.name().to_string()
    }
}

fn dir_annotation(node: &TreeNode) -> Option<String> {
    match node {
        TreeNode::Dir {
            error: Some(reason),
            ..
        } => Some(format!("[unreadable: {}]", reason)),
        _ => None,
    }
}

/// Summary line printed below a tree. The root is not counted.
pub fn summary(node: &TreeNode) -> String {
    format!("{} directories, {} files", node.dir_count(), node.file_count())
}

/// Formatter for console and plain-text trees.
pub struct TreeFormatter {
    config: OutputConfig,
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Plain-text rendering, including the summary line.
    pub fn format(&self, node: &TreeNode) -> String {
        let mut output = String::new();
        for line in layout(node, &self.config) {
            output.push_str(&line.plain());
            output.push('\n');
        }
        output.push('\n');
        output.push_str(&summary(node));
        output.push('\n');
        output
    }

    /// Write the tree to a color-capable writer.
    pub fn write<W: WriteColor>(&self, out: &mut W, node: &TreeNode) -> io::Result<()> {
        for line in layout(node, &self.config) {
            if self.config.use_color {
                line.write_colored(out, None)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", line.plain())?;
            }
        }
        writeln!(out)?;
        writeln!(out, "{}", summary(node))?;
        Ok(())
    }

    pub fn print(&self, node: &TreeNode) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write(&mut stdout, node)?;
        stdout.flush()
    }
}

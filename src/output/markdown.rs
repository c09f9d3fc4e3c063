//! Markdown output formatting
//!
//! This module provides `MarkdownFormatter` which outputs a tree as a
//! nested markdown list, suitable for documentation.

use std::io::{self, Write};

use crate::tree::{TreeNode, format_size};

use super::config::OutputConfig;
use super::tree::{TRUNCATED_MARKER, summary};
use super::utils::format_modified;

/// Markdown output formatter - renders the tree as a nested markdown list.
pub struct MarkdownFormatter {
    config: OutputConfig,
}

impl MarkdownFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, node: &TreeNode) -> String {
        let mut output = String::new();
        if self.config.icons {
            output.push_str("# 📂 ");
        } else {
            output.push_str("# ");
        }
        output.push_str(node.name());
        output.push_str("\n\n");

        self.format_children(node, 0, &mut output);

        output.push('\n');
        output.push('*');
        output.push_str(&summary(node));
        output.push_str("*\n");
        output
    }

    fn format_children(&self, node: &TreeNode, level: usize, output: &mut String) {
        let indent = "    ".repeat(level);

        if let TreeNode::Dir {
            children,
            truncated: true,
            ..
        } = node
        {
            if children.is_empty() {
                output.push_str(&indent);
                output.push_str("- *");
                output.push_str(TRUNCATED_MARKER);
                output.push_str("*\n");
                return;
            }
        }

        for child in node.children() {
            output.push_str(&indent);
            output.push_str("- ");
            let name = if self.config.full_path {
                child.path().display().to_string()
            } else {
                child.name().to_string()
            };

            match child {
                TreeNode::Dir { error, .. } => {
                    if self.config.icons {
                        output.push_str("📁 **");
                        output.push_str(&escape_emphasis(&name));
                        output.push_str("**");
                    } else {
                        output.push_str("**");
                        output.push_str(&escape_emphasis(&name));
                        output.push_str("/**");
                    }
                    if let Some(reason) = error {
                        output.push_str(" *(unreadable: ");
                        output.push_str(reason);
                        output.push_str(")*");
                    }
                    output.push('\n');
                    self.format_children(child, level + 1, output);
                }
                TreeNode::File { size, modified, .. } => {
                    if self.config.icons {
                        output.push_str("📄 ");
                    }
                    output.push('`');
                    output.push_str(&name);
                    output.push('`');
                    if let (true, Some(bytes)) = (self.config.show_size, size) {
                        output.push_str(" (");
                        output.push_str(&format_size(*bytes));
                        output.push(')');
                    }
                    if let (true, Some(time)) = (self.config.show_modified, modified) {
                        output.push_str(" - ");
                        output.push_str(&format_modified(time));
                    }
                    output.push('\n');
                }
            }
        }
    }
}

/// Backslash-escape characters that would end or nest the bold span.
fn escape_emphasis(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Print markdown output to stdout.
pub fn print_markdown(formatter: &MarkdownFormatter, node: &TreeNode) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(formatter.format(node).as_bytes())?;
    stdout.flush()
}

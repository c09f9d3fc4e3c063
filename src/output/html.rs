//! HTML export

use crate::tree::{TreeNode, format_size};

use super::config::OutputConfig;
use super::tree::{TRUNCATED_MARKER, summary};
use super::utils::{extension_hex, format_modified, html_escape};

pub(crate) const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            margin: 20px;
        }
        ul {
            list-style-type: none;
            padding-left: 20px;
        }
        .directory {
            color: #2c3e50;
            font-weight: bold;
        }
        .file {
            color: #34495e;
        }
        .meta {
            color: #7f8c8d;
            font-size: 0.9em;
        }
        .error {
            color: #c0392b;
        }
        .truncated {
            color: #95a5a6;
            font-style: italic;
        }
        .unique {
            background-color: #fcf3cf;
        }
"#;

/// Renders a tree as a standalone HTML page of nested lists.
pub struct HtmlFormatter {
    config: OutputConfig,
}

impl HtmlFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, node: &TreeNode) -> String {
        let title = html_escape(node.name());
        let mut body = String::new();
        self.format_list(node, 1, "", &|_: &str| false, &mut body);

        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n",
                "<head>\n",
                "    <meta charset=\"utf-8\">\n",
                "    <title>Directory Structure - {title}</title>\n",
                "    <style>\n{style}    </style>\n",
                "</head>\n",
                "<body>\n",
                "    <h1>📂 {title}</h1>\n",
                "{body}",
                "    <p class=\"meta\">{summary}</p>\n",
                "</body>\n",
                "</html>\n",
            ),
            title = title,
            style = STYLE,
            body = body,
            summary = summary(node),
        )
    }

    /// Nested `<ul>` for the children of `node`. Entries whose relative path
    /// satisfies `highlight` get the extra `unique` class.
    pub(crate) fn format_list(
        &self,
        node: &TreeNode,
        level: usize,
        rel: &str,
        highlight: &dyn Fn(&str) -> bool,
        out: &mut String,
    ) {
        let indent = "    ".repeat(level);
        out.push_str(&indent);
        out.push_str("<ul>\n");

        if let TreeNode::Dir {
            children,
            truncated: true,
            ..
        } = node
        {
            if children.is_empty() {
                out.push_str(&format!(
                    "{}    <li class=\"truncated\">{}</li>\n",
                    indent, TRUNCATED_MARKER
                ));
            }
        }

        for child in node.children() {
            let child_rel = if rel.is_empty() {
                child.name().to_string()
            } else {
                format!("{}/{}", rel, child.name())
            };
            let extra = if highlight(&child_rel) { " unique" } else { "" };
            let name = if self.config.full_path {
                html_escape(&child.path().display().to_string())
            } else {
                html_escape(child.name())
            };
            match child {
                TreeNode::Dir { error, .. } => {
                    out.push_str(&format!(
                        "{}    <li class=\"directory{}\">📁 {}",
                        indent, extra, name
                    ));
                    if let Some(reason) = error {
                        out.push_str(&format!(
                            " <span class=\"error\">[unreadable: {}]</span>",
                            html_escape(reason)
                        ));
                    }
                    out.push('\n');
                    self.format_list(child, level + 2, &child_rel, highlight, out);
                    out.push_str(&indent);
                    out.push_str("    </li>\n");
                }
                TreeNode::File { size, modified, .. } => {
                    let color = extension_hex(child.extension().as_deref());
                    out.push_str(&format!(
                        "{}    <li class=\"file{}\"><span style=\"color: {}\">📄</span> {}",
                        indent, extra, color, name
                    ));
                    if let (true, Some(bytes)) = (self.config.show_size, size) {
                        out.push_str(&format!(
                            " <span class=\"meta\">[{}]</span>",
                            format_size(*bytes)
                        ));
                    }
                    if let (true, Some(time)) = (self.config.show_modified, modified) {
                        out.push_str(&format!(
                            " <span class=\"meta\">{}</span>",
                            format_modified(time)
                        ));
                    }
                    out.push_str("</li>\n");
                }
            }
        }

        out.push_str(&indent);
        out.push_str("</ul>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OutputConfig {
        OutputConfig {
            use_color: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_html_structure() {
        let tree = TreeNode::dir("site", "site").with_children(vec![
            TreeNode::dir("css", "site/css")
                .with_children(vec![TreeNode::file("main.css", "site/css/main.css")]),
            TreeNode::file("index.html", "site/index.html"),
        ]);
        let html = HtmlFormatter::new(config()).format(&tree);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Directory Structure - site</title>"));
        assert!(html.contains("<li class=\"directory\">📁 css"));
        assert!(html.contains("main.css</li>"));
        assert!(html.contains("index.html</li>"));
        assert_eq!(html.matches("<ul>").count(), 2);
        assert_eq!(html.matches("</ul>").count(), 2);
        assert!(html.contains("1 directories, 2 files"));
    }

    #[test]
    fn test_html_escapes_names() {
        let tree = TreeNode::dir("<root>", "x")
            .with_children(vec![TreeNode::file("a&b<c>.txt", "x/a&b<c>.txt")]);
        let html = HtmlFormatter::new(config()).format(&tree);
        assert!(html.contains("&lt;root&gt;"));
        assert!(html.contains("a&amp;b&lt;c&gt;.txt"));
        assert!(!html.contains("a&b<c>.txt"));
    }
}

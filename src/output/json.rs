//! JSON export and re-import

use std::io;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tree::TreeNode;

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct JsonDocument<'a> {
    pub root: &'a str,
    pub tree: &'a TreeNode,
}

#[derive(Deserialize)]
struct ParsedDocument {
    tree: TreeNode,
}

/// Pretty-printed JSON for a tree.
pub fn to_json(node: &TreeNode) -> Result<String> {
    let doc = JsonDocument {
        root: node.name(),
        tree: node,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Rebuild a tree from the output of [`to_json`].
pub fn parse_json(json: &str) -> Result<TreeNode> {
    let doc: ParsedDocument = serde_json::from_str(json)?;
    Ok(doc.tree)
}

/// Print tree node as pretty-printed JSON to stdout.
pub fn print_json(node: &TreeNode) -> Result<()> {
    let json = to_json(node)?;
    let mut stdout = io::stdout().lock();
    io::Write::write_all(&mut stdout, json.as_bytes())?;
    io::Write::write_all(&mut stdout, b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn sample() -> TreeNode {
        TreeNode::dir("project", "/tmp/project").with_children(vec![
            TreeNode::Dir {
                name: "deep".to_string(),
                path: "/tmp/project/deep".into(),
                children: vec![],
                truncated: true,
                error: None,
            },
            TreeNode::Dir {
                name: "locked".to_string(),
                path: "/tmp/project/locked".into(),
                children: vec![],
                truncated: false,
                error: Some("permission denied".to_string()),
            },
            TreeNode::File {
                name: "a.txt".to_string(),
                path: "/tmp/project/a.txt".into(),
                size: Some(12),
                modified: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()),
            },
        ])
    }

    #[test]
    fn test_round_trip() {
        let tree = sample();
        let json = to_json(&tree).unwrap();
        assert_eq!(parse_json(&json).unwrap(), tree);
    }

    #[test]
    fn test_document_shape() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["root"], "project");
        assert_eq!(value["tree"]["type"], "dir");
        assert_eq!(value["tree"]["children"][2]["size"], 12);
        assert_eq!(value["tree"]["children"][0]["truncated"], true);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_json("{\"root\": 1}").is_err());
        assert!(parse_json("not json").is_err());
    }
}

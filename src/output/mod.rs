//! Tree formatting and export
//!
//! - `tree` - console / plain-text tree with box-drawing connectors
//! - `markdown` - nested markdown list
//! - `html` - standalone HTML page
//! - `json` - JSON document that parses back into the same tree
//! - `export` - format selection and writing export files

mod config;
mod export;
mod html;
mod json;
mod markdown;
mod tree;
mod utils;

pub use config::OutputConfig;
pub use export::{ExportFormat, Exporter, parse_formats};
pub use html::HtmlFormatter;
pub(crate) use html::STYLE as HTML_STYLE;
pub use json::{JsonDocument, parse_json, print_json, to_json};
pub use markdown::{MarkdownFormatter, print_markdown};
pub use tree::{LineKind, TRUNCATED_MARKER, TreeFormatter, TreeLine, layout, summary};
pub use utils::{extension_color, extension_hex, html_escape, pad_right};

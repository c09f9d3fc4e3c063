//! Writing trees to export files

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::error::{Error, Result};
use crate::tree::TreeNode;

use super::config::OutputConfig;
use super::html::HtmlFormatter;
use super::json::to_json;
use super::markdown::MarkdownFormatter;
use super::tree::TreeFormatter;

/// File formats a tree can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Txt,
    Json,
    Md,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Txt,
        ExportFormat::Json,
        ExportFormat::Md,
        ExportFormat::Html,
    ];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Md => "md",
            ExportFormat::Html => "html",
        }
    }

    /// Render a tree in this format. Exports are never colored.
    pub fn render(self, node: &TreeNode, config: &OutputConfig) -> Result<String> {
        let config = config.for_export();
        Ok(match self {
            ExportFormat::Txt => TreeFormatter::new(config).format(node),
            ExportFormat::Json => to_json(node)?,
            ExportFormat::Md => MarkdownFormatter::new(config).format(node),
            ExportFormat::Html => HtmlFormatter::new(config).format(node),
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Md),
            "html" | "htm" => Ok(ExportFormat::Html),
            _ => Err(Error::UnsupportedExportFormat(s.to_string())),
        }
    }
}

/// Parse a list of user-supplied format names, dropping duplicates.
pub fn parse_formats<S: AsRef<str>>(names: &[S]) -> Result<Vec<ExportFormat>> {
    let mut formats = Vec::new();
    for name in names {
        let format: ExportFormat = name.as_ref().parse()?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}

/// Writes rendered trees to `<output_dir>/<prefix>.<ext>`.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    prefix: String,
    config: OutputConfig,
}

impl Exporter {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        config: OutputConfig,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
            config,
        }
    }

    pub fn target(&self, format: ExportFormat) -> PathBuf {
        self.output_dir.join(format!("{}.{}", self.prefix, format.extension()))
    }

    /// Render and write one export, returning the written path.
    pub fn export(&self, node: &TreeNode, format: ExportFormat) -> Result<PathBuf> {
        let content = format.render(node, &self.config)?;
        self.write(format, &content)
    }

    /// Write already-rendered content for `format`.
    pub fn write(&self, format: ExportFormat, content: &str) -> Result<PathBuf> {
        ensure_dir(&self.output_dir)?;
        let target = self.target(format);
        fs::write(&target, content)?;
        info!(path = %target.display(), %format, "export written");
        Ok(target)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() && !dir.is_dir() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

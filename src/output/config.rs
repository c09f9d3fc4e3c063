//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Prefix entries with folder/file icons. Without icons, directories
    /// get a trailing `/` instead.
    pub icons: bool,
    pub show_size: bool,
    pub show_modified: bool,
    /// Show each entry's full path instead of its name.
    pub full_path: bool,
}

impl OutputConfig {
    /// Configuration for file exports: same layout, never colored.
    pub fn for_export(&self) -> Self {
        Self {
            use_color: false,
            ..self.clone()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            icons: true,
            show_size: false,
            show_modified: false,
            full_path: false,
        }
    }
}

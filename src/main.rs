//! CLI entry point for recursivist

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use recursivist::output::{MarkdownFormatter, print_json, print_markdown};
use recursivist::{
    ComparisonFormatter, Error, ExportFormat, Exporter, OutputConfig, Result, SortOrder,
    TreeFormatter, Walker, WalkerConfig, compare_dirs,
};
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // https://no-color.org/
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

/// Entry order within a directory
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SortArg {
    /// Directories first, then files by extension
    #[default]
    Type,
    /// By name only
    Name,
    /// Largest files first
    Size,
    /// Most recently modified files first
    Modified,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Type => SortOrder::Type,
            SortArg::Name => SortOrder::Name,
            SortArg::Size => SortOrder::Size,
            SortArg::Modified => SortOrder::Modified,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "recursivist")]
#[command(about = "Visualize directory structures as colored trees, export them, compare them")]
#[command(version)]
struct Args {
    /// Directory to display
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Descend only N levels deep (0 = unlimited)
    #[arg(short = 'L', long = "depth", default_value = "0")]
    depth: usize,

    /// Directory or file names to exclude (can be used multiple times)
    #[arg(short = 'e', long = "exclude")]
    exclude: Vec<String>,

    /// File extensions to exclude, e.g. `.log` or `pyc`
    #[arg(short = 'x', long = "exclude-ext")]
    exclude_ext: Vec<String>,

    /// Exclude entries matching these glob (or regex, with --regex) patterns
    #[arg(short = 'p', long = "exclude-pattern")]
    exclude_pattern: Vec<String>,

    /// Only show files matching these patterns; overrides exclusions
    #[arg(short = 'i', long = "include-pattern")]
    include_pattern: Vec<String>,

    /// Treat patterns as regular expressions instead of globs
    #[arg(short = 'r', long = "regex")]
    regex: bool,

    /// Honor gitignore-style rules from files with this name, e.g. `.gitignore`
    #[arg(short = 'g', long = "ignore-file", value_name = "NAME")]
    ignore_file: Option<String>,

    /// Hide entries whose name starts with a dot
    #[arg(long = "skip-hidden")]
    skip_hidden: bool,

    /// Order of entries within each directory
    #[arg(long = "sort", value_name = "ORDER", default_value = "type")]
    sort: SortArg,

    /// Sort names case-sensitively
    #[arg(long = "case-sensitive")]
    case_sensitive: bool,

    /// Show file sizes next to filenames
    #[arg(short = 's', long = "size")]
    size: bool,

    /// Show file modification times
    #[arg(short = 'm', long = "mtime")]
    mtime: bool,

    /// Show full paths instead of names
    #[arg(long = "full-path")]
    full_path: bool,

    /// Do not prefix entries with folder/file icons
    #[arg(long = "no-icons")]
    no_icons: bool,

    /// Export to these formats instead of printing: txt, json, md, html
    #[arg(short = 'f', long = "export", value_name = "FORMAT")]
    export: Vec<String>,

    /// Directory export files are written to
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// File name (without extension) of export files
    #[arg(short = 'n', long = "prefix", value_name = "NAME")]
    prefix: Option<String>,

    /// Compare PATH side by side with this directory
    #[arg(short = 'c', long = "compare", value_name = "OTHER")]
    compare: Option<PathBuf>,

    /// Print the tree as JSON to stdout
    #[arg(long = "json", conflicts_with_all = ["markdown", "export", "compare"])]
    json: bool,

    /// Print the tree as Markdown to stdout
    #[arg(long = "markdown", conflicts_with_all = ["json", "export", "compare"])]
    markdown: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            max_depth: (self.depth > 0).then_some(self.depth),
            show_hidden: !self.skip_hidden,
            exclude_names: self.exclude.clone(),
            exclude_extensions: self.exclude_ext.clone(),
            exclude_patterns: self.exclude_pattern.clone(),
            include_patterns: self.include_pattern.clone(),
            use_regex: self.regex,
            ignore_file: self.ignore_file.clone(),
            sort: self.sort.into(),
            ignore_case: !self.case_sensitive,
            collect_size: self.size,
            collect_modified: self.mtime,
        }
    }

    fn output_config(&self) -> OutputConfig {
        OutputConfig {
            use_color: !self.markdown && should_use_color(self.color),
            icons: !self.no_icons,
            show_size: self.size,
            show_modified: self.mtime,
            full_path: self.full_path,
        }
    }

    fn prefix(&self) -> &str {
        match (&self.prefix, &self.compare) {
            (Some(prefix), _) => prefix.as_str(),
            (None, Some(_)) => "comparison",
            (None, None) => "structure",
        }
    }
}

/// Route `tracing` output to stderr. `RECURSIVIST_LOG` overrides the level
/// picked from the `-v` count.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("RECURSIVIST_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .compact()
        .init();
}

fn run(args: &Args) -> Result<()> {
    // Everything that can be rejected up front is checked before walking.
    let formats = recursivist::output::parse_formats(&args.export)?;
    if args.compare.is_some() && formats.contains(&ExportFormat::Md) {
        return Err(Error::UnsupportedExportFormat(format!(
            "{} (not available for comparisons)",
            ExportFormat::Md
        )));
    }
    let walker = Walker::new(args.walker_config())?;
    let output_config = args.output_config();
    let exporter = Exporter::new(&args.output_dir, args.prefix(), output_config.clone());

    if let Some(other) = &args.compare {
        let cmp = compare_dirs(&walker, &args.path, other)?;
        let formatter = ComparisonFormatter::new(output_config.clone());
        if formats.is_empty() {
            formatter.print(&cmp)?;
        }
        let export_formatter = ComparisonFormatter::new(output_config.for_export());
        for format in formats {
            let content = export_formatter.render(&cmp, format)?;
            let path = exporter.write(format, &content)?;
            println!("Exported comparison to {}", path.display());
        }
        return Ok(());
    }

    let tree = walker.build(&args.path)?;
    debug!(
        dirs = tree.dir_count(),
        files = tree.file_count(),
        "tree built"
    );

    if args.json {
        return print_json(&tree);
    }
    if args.markdown {
        print_markdown(&MarkdownFormatter::new(output_config), &tree)?;
        return Ok(());
    }
    if formats.is_empty() {
        TreeFormatter::new(output_config).print(&tree)?;
        return Ok(());
    }
    for format in formats {
        let path = exporter.export(&tree, format)?;
        println!("Exported structure to {}", path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("recursivist: {}", e);
        process::exit(1);
    }
}

/*!
 * Configuration handling for batchview
 */

use std::env;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::error::Result;
use crate::host::SelectionSource;
use crate::report::ReportFormat;
use crate::types::Invocation;
use crate::utils::normalize_path;
use crate::walk::DEFAULT_MAX_DEPTH;
use crate::{bail, ensure};

/// Verbosity of diagnostics on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<Level> {
        match self {
            Self::Off => None,
            Self::Error => Some(Level::ERROR),
            Self::Warn => Some(Level::WARN),
            Self::Info => Some(Level::INFO),
            Self::Debug => Some(Level::DEBUG),
            Self::Trace => Some(Level::TRACE),
        }
    }
}

/// Command-line arguments for batchview
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "batchview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate a Markdown document with the tree and contents of selected files",
    long_about = "Renders the selected files and directories as an ASCII tree relative to the workspace root, followed by the full contents of every selected file in fenced code blocks."
)]
pub struct Args {
    /// Selected files and directories
    pub paths: Vec<PathBuf>,

    /// Workspace folder (repeatable, defaults to the current directory)
    #[clap(long = "workspace", short = 'w', value_name = "DIR")]
    pub workspaces: Vec<PathBuf>,

    /// Read the current selection from a file ('-' for stdin) when no paths are given
    #[clap(long, value_name = "FILE")]
    pub selection_from: Option<String>,

    /// Write the document to a file instead of stdout
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Copy the document to the system clipboard
    #[clap(long, help = "Copy output to system clipboard")]
    pub clip: bool,

    /// List directory entries by name instead of filesystem order
    #[clap(long)]
    pub sort: bool,

    /// Maximum directory nesting below a selected entry
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Show a progress bar on stderr
    #[clap(long)]
    pub progress: bool,

    /// Summary printed on stderr after generation
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report: ReportFormat,

    /// Log verbosity
    #[clap(long, short, value_enum, default_value_t = LogLevel::default())]
    pub log_level: LogLevel,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Selected paths, absolute
    pub paths: Vec<PathBuf>,

    /// Workspace folders, absolute
    pub workspace_roots: Vec<PathBuf>,

    /// Where the fallback selection comes from
    pub selection: SelectionSource,

    /// Output file, if any
    pub output_file: Option<PathBuf>,

    /// Copy output to clipboard
    pub clip: bool,

    /// Sort directory listings by name
    pub sort: bool,

    /// Maximum directory depth
    pub max_depth: usize,

    /// Show a progress bar
    pub progress: bool,

    /// Report format
    pub report: ReportFormat,

    /// Log verbosity
    pub log_level: LogLevel,

    /// Directory relative paths were resolved against
    pub cwd: PathBuf,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let cwd = env::current_dir()?;
        Ok(Self::from_args_in(args, &cwd))
    }

    /// Create configuration resolving relative paths against `cwd`
    pub fn from_args_in(args: Args, cwd: &Path) -> Self {
        let absolute = |path: &Path| normalize_path(&cwd.join(path));

        let workspace_roots = if args.workspaces.is_empty() {
            vec![normalize_path(cwd)]
        } else {
            args.workspaces.iter().map(|path| absolute(path.as_path())).collect()
        };

        let selection = match args.selection_from.as_deref() {
            None => SelectionSource::None,
            Some("-") => SelectionSource::Stdin,
            Some(path) => SelectionSource::File(absolute(Path::new(path))),
        };

        Self {
            paths: args.paths.iter().map(|path| absolute(path.as_path())).collect(),
            workspace_roots,
            selection,
            output_file: args.output.as_deref().map(absolute),
            clip: args.clip,
            sort: args.sort,
            max_depth: args.max_depth,
            progress: args.progress,
            report: args.report,
            log_level: args.log_level,
            cwd: normalize_path(cwd),
        }
    }

    /// The invocation described by this configuration
    pub fn invocation(&self) -> Invocation {
        Invocation::with_selection(self.paths.iter().cloned())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_depth > 0, Config, "--max-depth must be at least 1");

        for root in &self.workspace_roots {
            if !root.is_dir() {
                bail!(Config, "Workspace folder not found: {}", root.display());
            }
        }

        if let SelectionSource::File(path) = &self.selection {
            if !path.is_file() {
                bail!(Config, "Selection file not found: {}", path.display());
            }
        }

        // Check if output file directory exists
        if let Some(parent) = self.output_file.as_ref().and_then(|path| path.parent()) {
            if !parent.exists() {
                bail!(Config, "Output directory not found: {}", parent.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("batchview").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args_in(parse(&[]), Path::new("/ws"));

        assert!(config.paths.is_empty());
        assert_eq!(config.workspace_roots, vec![PathBuf::from("/ws")]);
        assert_eq!(config.selection, SelectionSource::None);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.report, ReportFormat::Table);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_relative_paths_are_resolved() {
        let args = parse(&[
            "src/a.txt",
            "../ws/b.txt",
            "--workspace",
            ".",
            "--selection-from",
            "sel.txt",
            "--output",
            "out/doc.md",
        ]);
        let config = Config::from_args_in(args, Path::new("/ws"));

        assert_eq!(
            config.paths,
            vec![PathBuf::from("/ws/src/a.txt"), PathBuf::from("/ws/b.txt")]
        );
        assert_eq!(config.workspace_roots, vec![PathBuf::from("/ws")]);
        assert_eq!(
            config.selection,
            SelectionSource::File(PathBuf::from("/ws/sel.txt"))
        );
        assert_eq!(config.output_file, Some(PathBuf::from("/ws/out/doc.md")));
        assert_eq!(config.cwd, PathBuf::from("/ws"));
    }

    #[test]
    fn test_stdin_selection() {
        let config = Config::from_args_in(parse(&["--selection-from", "-"]), Path::new("/ws"));
        assert_eq!(config.selection, SelectionSource::Stdin);
    }

    #[test]
    fn test_validate_rejects_missing_workspace() {
        let config = Config::from_args_in(parse(&["-w", "/definitely/not/here"]), Path::new("/"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_existing_paths() -> Result<()> {
        let temp_dir = tempdir()?;
        let config = Config::from_args_in(parse(&["--output", "doc.md"]), temp_dir.path());

        config.validate()
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = Config::from_args_in(parse(&["--max-depth", "0"]), Path::new("/"));
        assert!(config.validate().is_err());
    }
}

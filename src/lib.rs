/*!
 * batchview - Generate a Markdown view of selected files
 *
 * Given a selection of files and directories, this library renders an ASCII
 * tree of the selection relative to its workspace root, followed by the full
 * contents of every selected file in fenced code blocks.
 */

pub mod aggregate;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod error;
pub mod host;
pub mod present;
pub mod report;
pub mod selection;
pub mod tree;
pub mod types;
pub mod utils;
pub mod walk;


// Re-export main components for easier access
pub use aggregate::{AggregateStatistics, Aggregator};
pub use config::{Args, Config};
pub use document::{Generator, RenderedDocument};
pub use error::{BatchViewError, Result};
pub use host::{Host, LocalHost, SelectionSource};
pub use present::{ClipboardPresenter, FilePresenter, MultiPresenter, Presenter, StdoutPresenter};
pub use report::{ReportFormat, Reporter, RunReport};
pub use tree::{render_tree, Children, SelectionTree, TreeNode};
pub use types::{DirListing, EntryKind, FileEntry, Invocation};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

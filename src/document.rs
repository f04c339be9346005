/*!
 * Markdown document generation
 *
 * Glues the selection resolver, the tree renderer and the content aggregator
 * together and hands the result to a [`Presenter`].
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::aggregate::{AggregateStatistics, Aggregator};
use crate::error::{BatchViewError, Result};
use crate::host::Host;
use crate::present::Presenter;
use crate::selection;
use crate::tree;
use crate::types::{FileEntry, Invocation};
use crate::utils::count_files;
use crate::walk::DEFAULT_MAX_DEPTH;

/// Language hint passed along with the document
pub const MARKDOWN: &str = "markdown";

/// Message shown when there is nothing to generate a document for
pub const NO_SELECTION_MESSAGE: &str = "Please select files first";

/// A generated document and what went into it
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    markdown: String,
    tree: String,
    /// Entries the document was generated from
    pub entries: Vec<FileEntry>,
    pub statistics: AggregateStatistics,
}

impl RenderedDocument {
    /// Full Markdown text
    pub fn as_str(&self) -> &str {
        &self.markdown
    }

    /// The tree section alone
    pub fn tree(&self) -> &str {
        &self.tree
    }
}

/// Concatenate the tree and content sections
pub fn compose(tree: &str, content: &str) -> String {
    format!("# File Structure\n\n```\n{}```\n\n---\n\n{}", tree, content)
}

/// Generates documents against a host
pub struct Generator<'a, H: Host + ?Sized> {
    host: &'a H,
    max_depth: usize,
    progress: Arc<ProgressBar>,
}

impl<'a, H: Host + ?Sized> Generator<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            max_depth: DEFAULT_MAX_DEPTH,
            progress: Arc::new(ProgressBar::hidden()),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Resolve the selection and build the document
    pub fn generate(&self, invocation: &Invocation) -> Result<RenderedDocument> {
        let entries = selection::resolve(self.host, invocation)?;
        debug!("Resolved {} selected entries", entries.len());

        if !self.progress.is_hidden() {
            self.progress
                .set_length(count_files(self.host, &entries, self.max_depth));
        }

        let tree = tree::render_tree(self.host, &entries, self.max_depth);
        let (content, statistics) =
            Aggregator::new(self.host, self.max_depth, Arc::clone(&self.progress))
                .aggregate(&entries);

        info!(
            "Generated document with {} files ({} read errors)",
            statistics.files_processed, statistics.read_errors
        );

        Ok(RenderedDocument {
            markdown: compose(&tree, &content),
            tree,
            entries,
            statistics,
        })
    }

    /// Generate and present the document.
    ///
    /// An empty selection is reported through the presenter and returned as
    /// an error without showing any document.
    pub fn run<P: Presenter + ?Sized>(
        &self,
        invocation: &Invocation,
        presenter: &P,
    ) -> Result<RenderedDocument> {
        let document = match self.generate(invocation) {
            Ok(document) => document,
            Err(BatchViewError::NoSelection) => {
                presenter.show_error_message(NO_SELECTION_MESSAGE);
                return Err(BatchViewError::NoSelection);
            }
            Err(e) => return Err(e),
        };

        presenter.show_text_document(document.as_str(), MARKDOWN)?;
        Ok(document)
    }
}

/*!
 * Bounded directory traversal shared by the tree renderer and the aggregator
 *
 * Both halves of the document expand directories through this walker, so a
 * selected directory always contributes the same files to the tree and to the
 * content section. The walk uses an explicit stack and refuses to descend into
 * a directory that is its own ancestor or that lies deeper than `max_depth`.
 */

use std::path::PathBuf;
use std::rc::Rc;

use tracing::trace;

use crate::error::BatchViewError;
use crate::host::Host;
use crate::types::{EntryKind, FileEntry};

/// Default limit for directory nesting below a selected entry
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// One step of a walk
#[derive(Debug)]
pub enum WalkItem {
    /// A file, to be read by whoever consumes the walk
    File(FileEntry),
    /// A directory whose children follow
    Directory(FileEntry),
    /// A directory that could not be expanded
    Failed {
        entry: FileEntry,
        error: BatchViewError,
    },
}

impl WalkItem {
    pub fn entry(&self) -> &FileEntry {
        match self {
            Self::File(entry) | Self::Directory(entry) => entry,
            Self::Failed { entry, .. } => entry,
        }
    }
}

struct Frame {
    entry: FileEntry,
    depth: usize,
    ancestors: Rc<Vec<PathBuf>>,
}

/// Pre-order walk of a single selected entry in listing order
pub struct Walker<'a, H: Host + ?Sized> {
    host: &'a H,
    max_depth: usize,
    stack: Vec<Frame>,
}

impl<'a, H: Host + ?Sized> Walker<'a, H> {
    pub fn new(host: &'a H, root: FileEntry, max_depth: usize) -> Self {
        Self {
            host,
            max_depth,
            stack: vec![Frame {
                entry: root,
                depth: 0,
                ancestors: Rc::new(Vec::new()),
            }],
        }
    }

    fn expand(&mut self, frame: Frame) -> WalkItem {
        let Frame {
            entry,
            depth,
            ancestors,
        } = frame;

        if depth > self.max_depth {
            let error = BatchViewError::DepthLimitExceeded {
                path: entry.path.clone(),
                limit: self.max_depth,
            };
            return WalkItem::Failed { entry, error };
        }

        let identity = self
            .host
            .canonicalize(&entry.path)
            .unwrap_or_else(|_| entry.path.clone());
        if ancestors.contains(&identity) {
            let error = BatchViewError::CyclicDirectory(entry.path.clone());
            return WalkItem::Failed { entry, error };
        }

        let children = match self.host.list_directory(&entry.path) {
            Ok(children) => children,
            Err(source) => {
                let error = BatchViewError::ListDirectory {
                    path: entry.path.clone(),
                    source,
                };
                return WalkItem::Failed { entry, error };
            }
        };

        let mut chain = Vec::with_capacity(ancestors.len() + 1);
        chain.extend(ancestors.iter().cloned());
        chain.push(identity);
        let chain = Rc::new(chain);

        // Reversed so that popping yields listing order
        for child in children.iter().rev() {
            self.stack.push(Frame {
                entry: entry.child(child),
                depth: depth + 1,
                ancestors: Rc::clone(&chain),
            });
        }

        trace!("Expanded {} ({} children)", entry.path.display(), children.len());
        WalkItem::Directory(entry)
    }
}

impl<H: Host + ?Sized> Iterator for Walker<'_, H> {
    type Item = WalkItem;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.stack.pop()?;
        match frame.entry.kind {
            EntryKind::File => Some(WalkItem::File(frame.entry)),
            EntryKind::Directory => Some(self.expand(frame)),
        }
    }
}

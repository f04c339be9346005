/*!
 * Core types and data structures for batchview
 */

use std::path::{Path, PathBuf};

/// Kind of a filesystem entry as far as batchview cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory)
    File,
    /// Directory containing other entries
    Directory,
}

/// A selected or discovered filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the entry
    pub path: PathBuf,
    /// Whether the entry is a file or a directory
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::Directory)
    }

    /// Entry for a child found while listing this directory
    pub fn child(&self, listing: &DirListing) -> Self {
        Self::new(self.path.join(&listing.name), listing.kind)
    }

    /// Base name of the entry, falling back to the full path for roots
    pub fn name(&self) -> String {
        base_name(&self.path)
    }
}

/// One item of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub name: String,
    pub kind: EntryKind,
}

impl DirListing {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// What the user asked to generate a document for
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// The item the command was invoked on, if any
    pub primary: Option<PathBuf>,
    /// Every selected item, in selection order
    pub selected: Vec<PathBuf>,
}

impl Invocation {
    pub fn with_selection<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            primary: None,
            selected: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Last component of a path as a string
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

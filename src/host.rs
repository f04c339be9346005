/*!
 * Host capabilities consumed by the generator
 *
 * The core never touches the filesystem or UI state directly. Everything it
 * needs is asked from a [`Host`], which an editor integration, the CLI or a
 * test can provide.
 */

use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, ResultExt};
use crate::types::{DirListing, EntryKind};
use crate::utils::normalize_path;

/// Filesystem and workspace capabilities provided by the hosting environment
pub trait Host {
    /// Whether a path is a file or a directory
    fn stat_path(&self, path: &Path) -> io::Result<EntryKind>;

    /// Immediate children of a directory, in the host's own order
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirListing>>;

    /// Full content of a file as text
    fn read_file_text(&self, path: &Path) -> io::Result<String>;

    /// Workspace folder containing the path, if any
    fn workspace_root_for(&self, path: &Path) -> Option<PathBuf>;

    /// Entries currently selected in the host's explorer
    fn current_selection(&self) -> Result<Vec<PathBuf>>;

    /// Identity of a directory used for cycle detection
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

/// Where the local host reads the "explorer selection" from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    /// No selection is available
    None,
    /// Newline separated paths on standard input
    Stdin,
    /// Newline separated paths in a file
    File(PathBuf),
}

/// Host backed by the local filesystem and command line
#[derive(Debug, Clone)]
pub struct LocalHost {
    workspace_roots: Vec<PathBuf>,
    selection: SelectionSource,
    sort: bool,
    base_dir: Option<PathBuf>,
}

impl LocalHost {
    pub fn new(workspace_roots: Vec<PathBuf>, selection: SelectionSource, sort: bool) -> Self {
        Self {
            workspace_roots: workspace_roots
                .iter()
                .map(|root| normalize_path(root))
                .collect(),
            selection,
            sort,
            base_dir: None,
        }
    }

    /// Resolve relative selection lines against `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn parse_selection<R: BufRead>(&self, reader: R) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let path = match &self.base_dir {
                Some(base) => base.join(trimmed),
                None => PathBuf::from(trimmed),
            };
            paths.push(normalize_path(&path));
        }
        Ok(paths)
    }
}

impl Host for LocalHost {
    fn stat_path(&self, path: &Path) -> io::Result<EntryKind> {
        let metadata = fs::metadata(path)?;
        Ok(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirListing>> {
        // A missing or unreadable root would otherwise be an empty listing
        fs::read_dir(path)?;

        let mut walker = WalkDir::new(path).min_depth(1).max_depth(1);
        if self.sort {
            walker = walker.sort_by_file_name();
        }

        let mut listing = Vec::new();
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            // Follows symlinks, so a link to a directory lists as one
            let kind = if entry.path().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            listing.push(DirListing::new(
                entry.file_name().to_string_lossy().to_string(),
                kind,
            ));
        }

        debug!("Listed {} entries in {}", listing.len(), path.display());
        Ok(listing)
    }

    fn read_file_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn workspace_root_for(&self, path: &Path) -> Option<PathBuf> {
        let path = normalize_path(path);
        self.workspace_roots
            .iter()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
            .cloned()
    }

    fn current_selection(&self) -> Result<Vec<PathBuf>> {
        match &self.selection {
            SelectionSource::None => Ok(Vec::new()),
            SelectionSource::Stdin => {
                let mut input = String::new();
                io::stdin()
                    .read_to_string(&mut input)
                    .with_context(|| "Failed to read selection from stdin")?;
                self.parse_selection(input.as_bytes())
            }
            SelectionSource::File(path) => {
                let file = fs::File::open(path)
                    .with_context(|| format!("Failed to open selection file {}", path.display()))?;
                self.parse_selection(BufReader::new(file))
            }
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;

    use tempfile::tempdir;

    #[test]
    fn test_workspace_root_prefers_innermost() {
        let host = LocalHost::new(
            vec![PathBuf::from("/ws"), PathBuf::from("/ws/nested")],
            SelectionSource::None,
            false,
        );

        assert_eq!(
            host.workspace_root_for(Path::new("/ws/nested/src/lib.rs")),
            Some(PathBuf::from("/ws/nested"))
        );
        assert_eq!(
            host.workspace_root_for(Path::new("/ws/other/file.txt")),
            Some(PathBuf::from("/ws"))
        );
        assert_eq!(host.workspace_root_for(Path::new("/elsewhere")), None);
        // `..` must not escape the workspace lexically
        assert_eq!(host.workspace_root_for(Path::new("/ws/../etc/passwd")), None);
    }

    #[test]
    fn test_selection_from_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let selection_file = temp_dir.path().join("selection.txt");
        let mut file = File::create(&selection_file)?;
        writeln!(file, "/ws/a.txt\n\n  /ws/dir  \n")?;

        let host = LocalHost::new(
            vec![PathBuf::from("/ws")],
            SelectionSource::File(selection_file),
            false,
        );

        assert_eq!(
            host.current_selection()?,
            vec![PathBuf::from("/ws/a.txt"), PathBuf::from("/ws/dir")]
        );
        Ok(())
    }

    #[test]
    fn test_relative_selection_lines_use_base_dir() -> Result<()> {
        let temp_dir = tempdir()?;
        let selection_file = temp_dir.path().join("selection.txt");
        fs::write(&selection_file, "src/a.txt\n./docs/../README.md\n/abs/c.txt\n")?;

        let host = LocalHost::new(
            vec![PathBuf::from("/ws")],
            SelectionSource::File(selection_file),
            false,
        )
        .with_base_dir("/ws");

        assert_eq!(
            host.current_selection()?,
            vec![
                PathBuf::from("/ws/src/a.txt"),
                PathBuf::from("/ws/README.md"),
                PathBuf::from("/abs/c.txt"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_list_directory_sorted() -> Result<()> {
        let temp_dir = tempdir()?;
        File::create(temp_dir.path().join("b.txt"))?;
        File::create(temp_dir.path().join("a.txt"))?;
        fs::create_dir(temp_dir.path().join("c"))?;

        let host = LocalHost::new(vec![temp_dir.path().to_path_buf()], SelectionSource::None, true);
        let listing = host.list_directory(temp_dir.path())?;

        assert_eq!(
            listing,
            vec![
                DirListing::new("a.txt", EntryKind::File),
                DirListing::new("b.txt", EntryKind::File),
                DirListing::new("c", EntryKind::Directory),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let host = LocalHost::new(vec![], SelectionSource::None, false);
        assert!(host
            .list_directory(Path::new("/definitely/not/here/batchview"))
            .is_err());
    }
}

/*!
 * ASCII tree rendering of the selection
 */

use std::collections::HashMap;
use std::path::{Component, Path};

use tracing::warn;

use crate::error::BatchViewError;
use crate::host::Host;
use crate::types::{base_name, EntryKind, FileEntry};
use crate::utils::normalize_path;
use crate::walk::{WalkItem, Walker};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// A node of the selection tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File,
    Directory(Children),
}

/// Children of a directory node in insertion order, unique by name
#[derive(Debug, Clone, Default)]
pub struct Children {
    entries: Vec<(String, TreeNode)>,
    index: HashMap<String, usize>,
}

impl Children {
    pub fn as_slice(&self) -> &[(String, TreeNode)] {
        &self.entries
    }

    /// Child with the given name, created if missing.
    ///
    /// An existing file child asked for as a directory is promoted.
    fn get_or_insert(&mut self, name: &str, kind: EntryKind) -> &mut TreeNode {
        let existing = self.index.get(name).copied();
        let index = match existing {
            Some(index) => index,
            None => {
                self.entries.push((name.to_string(), TreeNode::new(kind)));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        let node = &mut self.entries[index].1;
        if kind == EntryKind::Directory && matches!(node, TreeNode::File) {
            *node = TreeNode::directory();
        }
        node
    }
}

impl PartialEq for Children {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Children {}

/// Later duplicates shadow earlier ones in lookups
impl From<Vec<(String, TreeNode)>> for Children {
    fn from(entries: Vec<(String, TreeNode)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, (name, _))| (name.clone(), position))
            .collect();
        Self { entries, index }
    }
}

impl TreeNode {
    fn new(kind: EntryKind) -> Self {
        match kind {
            EntryKind::File => Self::File,
            EntryKind::Directory => Self::directory(),
        }
    }

    /// Empty directory node
    pub fn directory() -> Self {
        Self::Directory(Children::default())
    }

    /// Children in insertion order, empty for files
    pub fn children(&self) -> &[(String, TreeNode)] {
        match self {
            Self::File => &[],
            Self::Directory(children) => children.as_slice(),
        }
    }

    /// Number of file leaves below this node
    pub fn file_count(&self) -> usize {
        match self {
            Self::File => 1,
            Self::Directory(children) => children
                .as_slice()
                .iter()
                .map(|(_, node)| node.file_count())
                .sum(),
        }
    }

    /// Insert a relative path, creating intermediate directories.
    ///
    /// Inserting below a file node promotes it to a directory.
    pub fn insert(&mut self, relative: &Path, kind: EntryKind) {
        let mut children = match self {
            Self::Directory(children) => children,
            Self::File => {
                *self = Self::directory();
                return self.insert(relative, kind);
            }
        };

        let segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        for (index, segment) in segments.iter().enumerate() {
            let segment_kind = if index + 1 == segments.len() {
                kind
            } else {
                EntryKind::Directory
            };
            match children.get_or_insert(segment, segment_kind) {
                TreeNode::Directory(next) => children = next,
                TreeNode::File => break,
            }
        }
    }

    fn render_into(&self, prefix: &str, out: &mut String) {
        let children = self.children();
        for (index, (name, child)) in children.iter().enumerate() {
            let is_last = index + 1 == children.len();
            out.push_str(prefix);
            out.push_str(if is_last { LAST_BRANCH } else { BRANCH });
            out.push_str(name);
            out.push('\n');

            let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
            child.render_into(&child_prefix, out);
        }
    }
}

/// Tree of the selection relative to its workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTree {
    /// Display name of the workspace root
    pub root_name: String,
    pub root: TreeNode,
}

impl SelectionTree {
    /// Build the tree for `entries`, expanding selected directories.
    ///
    /// The workspace root is taken from the first entry. Items outside of it
    /// are skipped.
    pub fn build<H: Host + ?Sized>(
        host: &H,
        entries: &[FileEntry],
        max_depth: usize,
    ) -> Result<Self, BatchViewError> {
        let first = entries.first().ok_or(BatchViewError::EmptyTreeInput)?;
        let workspace_root = host
            .workspace_root_for(&first.path)
            .ok_or(BatchViewError::EmptyTreeInput)?;

        let mut root = TreeNode::directory();
        for entry in entries {
            if host.workspace_root_for(&entry.path).as_deref() != Some(workspace_root.as_path()) {
                warn!(
                    "Skipping {} in tree: outside workspace {}",
                    entry.path.display(),
                    workspace_root.display()
                );
                continue;
            }

            for item in Walker::new(host, entry.clone(), max_depth) {
                let (entry, kind) = match &item {
                    WalkItem::File(entry) => (entry, EntryKind::File),
                    WalkItem::Directory(entry) => (entry, EntryKind::Directory),
                    WalkItem::Failed { entry, error } => {
                        warn!("Not expanding {} in tree: {}", entry.path.display(), error);
                        (entry, EntryKind::Directory)
                    }
                };

                let path = normalize_path(&entry.path);
                match path.strip_prefix(&workspace_root) {
                    Ok(relative) => root.insert(relative, kind),
                    Err(_) => warn!(
                        "Skipping {} in tree: outside workspace {}",
                        entry.path.display(),
                        workspace_root.display()
                    ),
                }
            }
        }

        Ok(Self {
            root_name: base_name(&workspace_root),
            root,
        })
    }

    /// Serialize as `├──`/`└──` lines under the root name
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.root_name);
        self.root.render_into("", &mut out);
        out
    }
}

/// Render the tree section, or an empty string when there is nothing to root it at
pub fn render_tree<H: Host + ?Sized>(host: &H, entries: &[FileEntry], max_depth: usize) -> String {
    match SelectionTree::build(host, entries, max_depth) {
        Ok(tree) => tree.render(),
        Err(e) => {
            warn!("Rendering an empty tree: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MemoryHost;
    use crate::walk::DEFAULT_MAX_DEPTH;

    #[test]
    fn test_two_files_in_subdirectory() {
        let host = MemoryHost::new("/proj")
            .dir("/proj/src")
            .file("/proj/src/a.txt", "hi")
            .file("/proj/src/b.txt", "bye");
        let entries = vec![
            FileEntry::file("/proj/src/a.txt"),
            FileEntry::file("/proj/src/b.txt"),
        ];

        let tree = render_tree(&host, &entries, DEFAULT_MAX_DEPTH);

        assert_eq!(
            tree,
            "proj\n└── src\n    ├── a.txt\n    └── b.txt\n"
        );
    }

    #[test]
    fn test_vertical_bars_continue_only_under_open_siblings() {
        let host = MemoryHost::new("/proj")
            .dir("/proj/a")
            .file("/proj/a/x.rs", "")
            .dir("/proj/a/deep")
            .file("/proj/a/deep/y.rs", "")
            .file("/proj/z.rs", "");
        let entries = vec![FileEntry::directory("/proj/a"), FileEntry::file("/proj/z.rs")];

        let tree = render_tree(&host, &entries, DEFAULT_MAX_DEPTH);

        let expected = "proj\n\
                        ├── a\n\
                        │   ├── x.rs\n\
                        │   └── deep\n\
                        │       └── y.rs\n\
                        └── z.rs\n";
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_duplicate_selection_inserted_once() {
        let host = MemoryHost::new("/proj").file("/proj/a.txt", "");
        let entries = vec![FileEntry::file("/proj/a.txt"), FileEntry::file("/proj/a.txt")];

        let tree = SelectionTree::build(&host, &entries, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(tree.root.file_count(), 1);
    }

    #[test]
    fn test_empty_directory_stays_a_directory() {
        let host = MemoryHost::new("/proj").dir("/proj/empty");
        let entries = vec![FileEntry::directory("/proj/empty")];

        let tree = SelectionTree::build(&host, &entries, DEFAULT_MAX_DEPTH).unwrap();

        assert_eq!(
            tree.root.children(),
            &[("empty".to_string(), TreeNode::directory())]
        );
        assert_eq!(tree.root.file_count(), 0);
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        let host = MemoryHost::new("/proj");
        assert_eq!(render_tree(&host, &[], DEFAULT_MAX_DEPTH), "");
    }

    #[test]
    fn test_entry_outside_workspace_is_skipped() {
        let host = MemoryHost::new("/proj")
            .file("/proj/a.txt", "")
            .file("/other/b.txt", "");
        let entries = vec![FileEntry::file("/proj/a.txt"), FileEntry::file("/other/b.txt")];

        assert_eq!(render_tree(&host, &entries, DEFAULT_MAX_DEPTH), "proj\n└── a.txt\n");
    }

    #[test]
    fn test_file_promoted_when_used_as_directory() {
        let mut root = TreeNode::directory();
        root.insert(Path::new("lib"), EntryKind::File);
        root.insert(Path::new("lib/mod.rs"), EntryKind::File);

        assert_eq!(
            root.children(),
            &[(
                "lib".to_string(),
                TreeNode::Directory(Children::from(vec![("mod.rs".to_string(), TreeNode::File)]))
            )]
        );
    }

    #[test]
    fn test_parent_components_resolved_before_insertion() {
        let host = MemoryHost::new("/proj")
            .dir("/proj/src")
            .file("/proj/src/a.txt", "")
            .file("/proj/top.txt", "");
        let entries = vec![
            FileEntry::file("/proj/src/a.txt"),
            FileEntry::file("/proj/src/../top.txt"),
        ];

        assert_eq!(
            render_tree(&host, &entries, DEFAULT_MAX_DEPTH),
            "proj\n├── src\n│   └── a.txt\n└── top.txt\n"
        );
    }

    #[test]
    fn test_wide_directory_keeps_insertion_order() {
        let mut root = TreeNode::directory();
        for n in (0..2000).rev() {
            root.insert(Path::new(&format!("dir/f{}.rs", n)), EntryKind::File);
        }
        root.insert(Path::new("dir/f7.rs"), EntryKind::File);

        let dir = &root.children()[0].1;
        assert_eq!(dir.children().len(), 2000);
        assert_eq!(dir.children()[0].0, "f1999.rs");
        assert_eq!(dir.children()[1999].0, "f0.rs");
    }

    #[test]
    fn test_insert_into_file_node_promotes_it() {
        let mut node = TreeNode::File;
        node.insert(Path::new("child.rs"), EntryKind::File);

        assert_eq!(node.children().len(), 1);
        assert_eq!(node.file_count(), 1);
    }
}

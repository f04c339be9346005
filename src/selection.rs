/*!
 * Resolution of the user's selection into filesystem entries
 */

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{BatchViewError, Result};
use crate::host::Host;
use crate::types::{FileEntry, Invocation};
use crate::utils::normalize_path;

/// Turn an invocation into the entries to render.
///
/// Explicitly selected paths win, then the primary path, then whatever the
/// host reports as currently selected. An empty result is a
/// [`BatchViewError::NoSelection`] and nothing else is touched.
pub fn resolve<H: Host + ?Sized>(host: &H, invocation: &Invocation) -> Result<Vec<FileEntry>> {
    let paths: Vec<PathBuf> = if !invocation.selected.is_empty() {
        invocation.selected.clone()
    } else if let Some(primary) = &invocation.primary {
        vec![primary.clone()]
    } else {
        debug!("No explicit selection, asking the host");
        host.current_selection()?
    };

    if paths.is_empty() {
        return Err(BatchViewError::NoSelection);
    }

    let entries = paths
        .into_iter()
        .map(|path| normalize_path(&path))
        .map(|path| match host.stat_path(&path) {
            Ok(kind) => FileEntry::new(path, kind),
            Err(e) => {
                // Kept as a file so the failure shows up in the document
                warn!("Cannot stat {}: {}", path.display(), e);
                FileEntry::file(path)
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MemoryHost;
    use crate::types::EntryKind;

    fn host() -> MemoryHost {
        MemoryHost::new("/proj")
            .file("/proj/a.txt", "a")
            .dir("/proj/src")
            .file("/proj/src/lib.rs", "lib")
    }

    #[test]
    fn test_explicit_selection_is_kept_in_order() {
        let host = host().selected(&["/proj/a.txt"]);
        let invocation = Invocation::with_selection(["/proj/src", "/proj/a.txt"]);

        let entries = resolve(&host, &invocation).unwrap();

        assert_eq!(
            entries,
            vec![
                FileEntry::directory("/proj/src"),
                FileEntry::file("/proj/a.txt"),
            ]
        );
    }

    #[test]
    fn test_primary_used_without_selection() {
        let invocation = Invocation {
            primary: Some(PathBuf::from("/proj/src")),
            selected: vec![],
        };

        let entries = resolve(&host(), &invocation).unwrap();
        assert_eq!(entries, vec![FileEntry::directory("/proj/src")]);
    }

    #[test]
    fn test_falls_back_to_host_selection() {
        let host = host().selected(&["/proj/src/lib.rs"]);

        let entries = resolve(&host, &Invocation::default()).unwrap();
        assert_eq!(entries, vec![FileEntry::file("/proj/src/lib.rs")]);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let err = resolve(&host(), &Invocation::default()).unwrap_err();
        assert!(matches!(err, BatchViewError::NoSelection));
    }

    #[test]
    fn test_unknown_path_becomes_file_entry() {
        let invocation = Invocation::with_selection(["/proj/missing.txt"]);

        let entries = resolve(&host(), &invocation).unwrap();
        assert_eq!(entries[0].kind, EntryKind::File);
    }

    #[test]
    fn test_parent_components_are_normalized() {
        let invocation = Invocation::with_selection(["/proj/src/./../a.txt", "/proj/src/"]);

        let entries = resolve(&host(), &invocation).unwrap();
        assert_eq!(
            entries,
            vec![
                FileEntry::file("/proj/a.txt"),
                FileEntry::directory("/proj/src"),
            ]
        );
    }
}

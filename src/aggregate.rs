/*!
 * Aggregation of file contents into Markdown sections
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::BatchViewError;
use crate::host::Host;
use crate::report::FileReportInfo;
use crate::types::FileEntry;
use crate::walk::{WalkItem, Walker};

/// Aggregation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStatistics {
    /// Number of file sections emitted
    pub files_processed: usize,
    /// Files whose content could not be read
    pub read_errors: usize,
    /// Directories that could not be expanded
    pub skipped_directories: usize,
    /// Total number of lines embedded
    pub total_lines: usize,
    /// Total number of characters embedded
    pub total_chars: usize,
    /// Total number of bytes embedded
    pub total_bytes: u64,
    /// Details for each file, in document order
    pub file_details: Vec<FileReportInfo>,
}

/// Walks the selection and emits one section per file
pub struct Aggregator<'a, H: Host + ?Sized> {
    host: &'a H,
    max_depth: usize,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl<'a, H: Host + ?Sized> Aggregator<'a, H> {
    pub fn new(host: &'a H, max_depth: usize, progress: Arc<ProgressBar>) -> Self {
        Self {
            host,
            max_depth,
            progress,
        }
    }

    /// Content section for all entries, in traversal order
    pub fn aggregate(&self, entries: &[FileEntry]) -> (String, AggregateStatistics) {
        let mut out = String::new();
        let mut stats = AggregateStatistics::default();

        for entry in entries {
            for item in Walker::new(self.host, entry.clone(), self.max_depth) {
                match item {
                    WalkItem::File(file) => self.process_file(&file, &mut out, &mut stats),
                    WalkItem::Directory(dir) => debug!("Entering {}", dir.path.display()),
                    WalkItem::Failed { entry, error } => {
                        warn!("Skipping directory {}: {}", entry.path.display(), error);
                        stats.skipped_directories += 1;
                        out.push_str(&format!(
                            "Error reading directory {}: {}\n\n",
                            entry.name(),
                            error
                        ));
                    }
                }
            }
        }

        (out, stats)
    }

    /// Emit the heading and fenced content (or inline error) for one file
    fn process_file(&self, file: &FileEntry, out: &mut String, stats: &mut AggregateStatistics) {
        let name = file.name();
        self.progress.inc(1);
        self.progress.set_message(format!("Current file: {}", name));

        out.push_str(&format!("\n## {}\n\n", name));
        stats.files_processed += 1;

        match self.host.read_file_text(&file.path) {
            Ok(content) => {
                out.push_str("```\n");
                out.push_str(&content);
                out.push_str("\n```\n\n");

                let info = FileReportInfo {
                    path: file.path.display().to_string(),
                    lines: content.lines().count(),
                    chars: content.chars().count(),
                    bytes: content.len() as u64,
                };
                stats.total_lines += info.lines;
                stats.total_chars += info.chars;
                stats.total_bytes += info.bytes;
                stats.file_details.push(info);
            }
            Err(source) => {
                out.push_str(&format!("Error reading file: {}\n\n", source));
                stats.read_errors += 1;

                let error = BatchViewError::FileRead {
                    path: file.path.clone(),
                    source,
                };
                warn!("{}", error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MemoryHost;
    use crate::walk::DEFAULT_MAX_DEPTH;

    fn aggregate(host: &MemoryHost, entries: &[FileEntry]) -> (String, AggregateStatistics) {
        Aggregator::new(host, DEFAULT_MAX_DEPTH, Arc::new(ProgressBar::hidden())).aggregate(entries)
    }

    #[test]
    fn test_single_file_section() {
        let host = MemoryHost::new("/proj").file("/proj/a.txt", "hi");

        let (content, stats) = aggregate(&host, &[FileEntry::file("/proj/a.txt")]);

        assert_eq!(content, "\n## a.txt\n\n```\nhi\n```\n\n");
        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.total_bytes, 2);
    }

    #[test]
    fn test_directory_expands_depth_first() {
        let host = MemoryHost::new("/proj")
            .dir("/proj/src")
            .dir("/proj/src/inner")
            .file("/proj/src/inner/deep.rs", "deep")
            .file("/proj/src/top.rs", "top");

        let (content, stats) = aggregate(&host, &[FileEntry::directory("/proj/src")]);

        let deep = content.find("## deep.rs").unwrap();
        let top = content.find("## top.rs").unwrap();
        assert!(deep < top);
        assert_eq!(stats.files_processed, 2);
    }

    #[test]
    fn test_read_failure_is_inline_and_not_fatal() {
        let host = MemoryHost::new("/proj")
            .unreadable("/proj/secret.txt", "permission denied")
            .file("/proj/after.txt", "still here");
        let entries = vec![
            FileEntry::file("/proj/secret.txt"),
            FileEntry::file("/proj/after.txt"),
        ];

        let (content, stats) = aggregate(&host, &entries);

        assert_eq!(
            content,
            "\n## secret.txt\n\nError reading file: permission denied\n\n\
             \n## after.txt\n\n```\nstill here\n```\n\n"
        );
        assert_eq!(stats.read_errors, 1);
        assert_eq!(stats.files_processed, 2);
    }

    #[test]
    fn test_content_embedded_verbatim() {
        let body = "line one\n```\nnested fence\n";
        let host = MemoryHost::new("/proj").file("/proj/notes.md", body);

        let (content, _) = aggregate(&host, &[FileEntry::file("/proj/notes.md")]);

        assert!(content.contains(&format!("```\n{}\n```\n\n", body)));
    }
}

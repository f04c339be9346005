/*!
 * Presentation of generated documents
 */

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{error, info};

use crate::clipboard;
use crate::error::{Result, ResultExt};

/// Display surface for documents and error notifications
pub trait Presenter {
    /// Show a finished document
    fn show_text_document(&self, content: &str, language: &str) -> Result<()>;

    /// Notify the user of a failure
    fn show_error_message(&self, text: &str);

    /// Where documents end up, for reporting
    fn describe(&self) -> String;
}

/// Writes documents to standard output
#[derive(Debug, Default)]
pub struct StdoutPresenter;

impl Presenter for StdoutPresenter {
    fn show_text_document(&self, content: &str, _language: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn show_error_message(&self, text: &str) {
        eprintln!("Error: {}", text);
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

/// Writes documents to a file
#[derive(Debug)]
pub struct FilePresenter {
    path: PathBuf,
}

impl FilePresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Presenter for FilePresenter {
    fn show_text_document(&self, content: &str, _language: &str) -> Result<()> {
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("Wrote document to {}", self.path.display());
        Ok(())
    }

    fn show_error_message(&self, text: &str) {
        eprintln!("Error: {}", text);
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Copies documents to the system clipboard
#[derive(Debug, Default)]
pub struct ClipboardPresenter;

impl Presenter for ClipboardPresenter {
    fn show_text_document(&self, content: &str, _language: &str) -> Result<()> {
        let provider = clipboard::copy_to_clipboard(content)?;
        info!("Copied document to clipboard using {:?}", provider);
        Ok(())
    }

    fn show_error_message(&self, text: &str) {
        error!("{}", text);
        eprintln!("Error: {}", text);
    }

    fn describe(&self) -> String {
        "clipboard".to_string()
    }
}

/// Fans a document out to several presenters
#[derive(Default)]
pub struct MultiPresenter {
    presenters: Vec<Box<dyn Presenter>>,
}

impl MultiPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenters.push(Box::new(presenter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.presenters.is_empty()
    }
}

impl Presenter for MultiPresenter {
    fn show_text_document(&self, content: &str, language: &str) -> Result<()> {
        for presenter in &self.presenters {
            presenter.show_text_document(content, language)?;
        }
        Ok(())
    }

    /// Shown once, by the first presenter
    fn show_error_message(&self, text: &str) {
        if let Some(presenter) = self.presenters.first() {
            presenter.show_error_message(text);
        }
    }

    fn describe(&self) -> String {
        self.presenters
            .iter()
            .map(|presenter| presenter.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

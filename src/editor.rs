//! Rich-text editor abstraction for entry content.
//!
//! The journal treats entry content as opaque HTML. An editor only has to
//! hand back its current content as HTML and accept new content as HTML,
//! which keeps the journal testable with an in-memory editor.

use crate::errors::{AppError, AppResult, EditorError};
use std::fs;
use std::process::Command;
use tracing::debug;

/// A surface that holds rich-text content as HTML.
///
/// # Examples
///
/// ```
/// use moodjournal::editor::RichTextEditor;
/// use moodjournal::errors::AppResult;
///
/// struct Buffer(String);
///
/// impl RichTextEditor for Buffer {
///     fn current_html(&self) -> AppResult<String> {
///         Ok(self.0.clone())
///     }
///
///     fn set_html(&mut self, html: &str) {
///         self.0 = html.to_string();
///     }
/// }
///
/// let mut buffer = Buffer(String::new());
/// buffer.set_html("<p>Hello</p>");
/// assert_eq!(buffer.current_html().unwrap(), "<p>Hello</p>");
/// ```
pub trait RichTextEditor {
    /// Returns the content as it stands now.
    ///
    /// # Errors
    ///
    /// Implementations that talk to an external process report launch and
    /// exit failures as [`AppError::Editor`].
    fn current_html(&self) -> AppResult<String>;

    /// Replaces the content.
    fn set_html(&mut self, html: &str);
}

/// Edits content in an external program through a temporary `.html` file.
///
/// The file is seeded with the content last passed to
/// [`set_html`](RichTextEditor::set_html), handed to the editor command, and
/// read back once the editor exits successfully. The file is removed
/// afterwards.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    /// Editor command, already validated by [`Config`](crate::config::Config).
    pub command: String,
    seed: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        ExternalEditor {
            command: command.into(),
            seed: String::new(),
        }
    }

    fn launch(&self, path: &std::path::Path) -> AppResult<()> {
        debug!("Launching editor: {} {:?}", self.command, path);

        match Command::new(&self.command).arg(path).status() {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::Editor(EditorError::CommandNotFound {
                    command: self.command.clone(),
                    source: e,
                }))
            }
            Err(e) => Err(AppError::Editor(EditorError::ExecutionFailed {
                command: self.command.clone(),
                source: e,
            })),
            Ok(status) if !status.success() => Err(AppError::Editor(EditorError::NonZeroExit {
                command: self.command.clone(),
                status_code: status.code().unwrap_or(-1),
            })),
            Ok(_) => Ok(()),
        }
    }
}

impl RichTextEditor for ExternalEditor {
    fn current_html(&self) -> AppResult<String> {
        let file = tempfile::Builder::new()
            .prefix("moodjournal-")
            .suffix(".html")
            .tempfile()?;
        fs::write(file.path(), &self.seed)?;

        self.launch(file.path())?;

        let html = fs::read_to_string(file.path())?;
        debug!("Editor returned {} bytes", html.len());
        Ok(html)
    }

    fn set_html(&mut self, html: &str) {
        self.seed = html.to_string();
    }
}

/// Seeds `editor` with `initial` and returns what the user left in it.
pub fn compose(editor: &mut dyn RichTextEditor, initial: &str) -> AppResult<String> {
    editor.set_html(initial);
    editor.current_html()
}

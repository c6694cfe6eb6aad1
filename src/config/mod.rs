//! Configuration management for the moodjournal application.
//!
//! Settings come from environment variables with sensible defaults. They
//! locate the app-data directory holding the SQLite database and choose the
//! external editor used for entry content.
//!
//! # Environment Variables
//!
//! - `MOODJOURNAL_DIR`: App-data directory (defaults to `~/.moodjournal`)
//! - `MOODJOURNAL_EDITOR`: Editor for entry content
//! - `EDITOR`: Fallback editor if `MOODJOURNAL_EDITOR` is not set (defaults to "vi")
//! - `MOODJOURNAL_LOG_FORMAT`: `text` (default) or `json`
//! - `HOME`: Used for the default data directory

use crate::constants::{
    DATABASE_FILE_NAME, DEFAULT_DATA_SUBDIR, DEFAULT_EDITOR_COMMAND, EDITOR_FORBIDDEN_CHARS,
    ENV_VAR_EDITOR, ENV_VAR_HOME, ENV_VAR_LOG_FORMAT, ENV_VAR_MOODJOURNAL_DIR,
    ENV_VAR_MOODJOURNAL_EDITOR, LOG_FORMAT_JSON, LOG_FORMAT_TEXT, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for the moodjournal application.
///
/// # Examples
///
/// ```
/// use moodjournal::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     editor: "nano".to_string(),
///     data_dir: PathBuf::from("/path/to/data"),
///     log_format: "text".to_string(),
/// };
/// assert_eq!(config.database_path(), PathBuf::from("/path/to/data/moodjournal.db3"));
/// ```
pub struct Config {
    /// Editor command for entry content.
    ///
    /// Loaded from `MOODJOURNAL_EDITOR`, then `EDITOR`, then "vi".
    pub editor: String,

    /// Directory holding the database file.
    pub data_dir: PathBuf,

    /// Log output format, `text` or `json`.
    pub log_format: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("editor", &REDACTED_PLACEHOLDER)
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            editor: DEFAULT_EDITOR_COMMAND.to_string(),
            data_dir: PathBuf::from(""),
            log_format: LOG_FORMAT_TEXT.to_string(),
        }
    }
}

impl Config {
    /// Validates an editor command string for security.
    ///
    /// The command must be non-empty, contain no spaces, and contain no shell
    /// metacharacters.
    fn validate_editor_command(editor_cmd: &str) -> AppResult<&str> {
        if editor_cmd.is_empty() {
            return Err(AppError::Config(
                "Editor command cannot be empty".to_string(),
            ));
        }

        if editor_cmd.contains(' ') {
            return Err(AppError::Config(
                "Editor command cannot contain spaces. Use a wrapper script or shell alias for editors requiring arguments".to_string(),
            ));
        }

        if let Some(ch) = editor_cmd.chars().find(|c| EDITOR_FORBIDDEN_CHARS.contains(c)) {
            return Err(AppError::Config(format!(
                "Editor command cannot contain shell metacharacters: '{}'. Use a wrapper script or shell alias instead",
                ch
            )));
        }

        Ok(editor_cmd)
    }

    fn validate_log_format(format: &str) -> AppResult<String> {
        let format = format.trim().to_lowercase();
        if format == LOG_FORMAT_TEXT || format == LOG_FORMAT_JSON {
            Ok(format)
        } else {
            Err(AppError::Config(format!(
                "Unknown log format '{}', expected '{}' or '{}'",
                format, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            )))
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// The data directory is expanded with `shellexpand`, so `~` and
    /// `$VARS` work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if path expansion fails, the path is empty,
    /// the editor command is unsafe, or the log format is unknown.
    pub fn load() -> AppResult<Self> {
        let editor_raw = env::var(ENV_VAR_MOODJOURNAL_EDITOR)
            .or_else(|_| env::var(ENV_VAR_EDITOR))
            .unwrap_or_else(|_| DEFAULT_EDITOR_COMMAND.to_string());
        let editor = Config::validate_editor_command(&editor_raw)?;

        let data_dir_str = env::var(ENV_VAR_MOODJOURNAL_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let log_format = match env::var(ENV_VAR_LOG_FORMAT) {
            Ok(raw) => Config::validate_log_format(&raw)?,
            Err(_) => LOG_FORMAT_TEXT.to_string(),
        };

        Ok(Config {
            editor: editor.to_string(),
            data_dir,
            log_format,
        })
    }

    /// Checks that the data directory is absolute and the editor is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodjournal::Config;
    /// use std::path::PathBuf;
    ///
    /// let mut config = Config {
    ///     editor: "vim".to_string(),
    ///     data_dir: PathBuf::from("/absolute/path"),
    ///     log_format: "text".to_string(),
    /// };
    /// assert!(config.validate().is_ok());
    ///
    /// config.data_dir = PathBuf::from("relative");
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if self.editor.is_empty() {
            return Err(AppError::Config("Editor command is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }

    /// Location of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn is_json_logging(&self) -> bool {
        self.log_format == LOG_FORMAT_JSON
    }
}

/// Creates the data directory if needed, readable only by its owner.
///
/// # Errors
///
/// Returns `AppError::Config` for a relative path, or `AppError::Io` if the
/// directory cannot be created or its permissions set.
pub fn ensure_data_dir(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if data_dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(data_dir).map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create data directory: {}", e),
        ))
    })?;

    #[cfg(unix)]
    {
        use crate::constants::DEFAULT_DIR_PERMISSIONS;
        use std::os::unix::fs::PermissionsExt;

        let permissions = fs::Permissions::from_mode(DEFAULT_DIR_PERMISSIONS);
        fs::set_permissions(data_dir, permissions).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to set secure permissions on data directory: {}", e),
            ))
        })?;
        debug!("Set 0o700 permissions on data directory");
    }

    Ok(())
}

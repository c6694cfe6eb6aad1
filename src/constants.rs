//! Constants used throughout the application.
//!
//! This module contains all constants used in the moodjournal application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodjournal";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A personal mood journal: one entry per day, tags, moods and avatar stickers";

// CLI Arguments & Defaults
/// Default command for the editor if not specified otherwise.
pub const DEFAULT_EDITOR_COMMAND: &str = "vi";
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the app-data directory holding the database file.
pub const ENV_VAR_MOODJOURNAL_DIR: &str = "MOODJOURNAL_DIR";
/// Environment variable for specifying the preferred editor.
pub const ENV_VAR_MOODJOURNAL_EDITOR: &str = "MOODJOURNAL_EDITOR";
/// Standard environment variable for specifying the default editor.
pub const ENV_VAR_EDITOR: &str = "EDITOR";
/// Environment variable selecting the log output format.
pub const ENV_VAR_LOG_FORMAT: &str = "MOODJOURNAL_LOG_FORMAT";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for app data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".moodjournal";
/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "moodjournal.db3";

// Validation
/// Characters forbidden in editor commands for security reasons.
pub const EDITOR_FORBIDDEN_CHARS: &[char] =
    &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";
/// Maximum length of an entry title, in characters.
pub const MAX_TITLE_LENGTH: usize = 100;
/// Maximum length of a tag name, in characters.
pub const MAX_TAG_NAME_LENGTH: usize = 50;
/// Maximum number of secondary moods on one entry.
pub const MAX_SECONDARY_MOODS: usize = 2;
/// Exact length of a PIN credential.
pub const PIN_LENGTH: usize = 6;
/// Minimum length of a password credential.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Salt size for credential hashing, in bytes (256 bits).
pub const SALT_LENGTH: usize = 32;

// File System Parameters
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Length of the `YYYY-MM` prefix used to group entries by month.
pub const MONTH_KEY_LENGTH: usize = 7;

// Rendering
/// Default mood sticker width in pixels.
pub const DEFAULT_STICKER_SIZE: u32 = 80;
/// Default full avatar width in pixels.
pub const DEFAULT_AVATAR_SIZE: u32 = 200;
/// Default number of most-used tags to list.
pub const DEFAULT_TOP_TAGS: usize = 10;
/// Default number of suggested tags.
pub const DEFAULT_SUGGESTED_TAGS: usize = 5;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "moodjournal";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

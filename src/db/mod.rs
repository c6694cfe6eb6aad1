//! Persistence store for settings, profile, avatar, credentials, entries and tags.
//!
//! This module owns the SQLite database file and its schema lifecycle. It uses
//! connection pooling via r2d2; schema creation and default-settings seeding
//! run lazily the first time a connection is requested and are skipped on
//! every later request (and, for seeding, on every later process start).
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `settings`: Key/value application settings
//! - `profile`: The singleton user profile
//! - `avatars`: Avatar configurations
//! - `credentials`: The PIN/password credential
//! - `entries`: Journal entry CRUD and aggregate queries
//! - `tags`: Tags and entry-tag links
//!
//! Functions in the submodules take a `&rusqlite::Connection` so the service
//! layer can group several of them inside one transaction.
//!
//! # Example
//!
//! ```no_run
//! use moodjournal::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/moodjournal.db3"))?;
//! db.initialize()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod avatars;
pub mod credentials;
pub mod entries;
pub mod profile;
pub mod schema;
pub mod settings;
pub mod tags;

use crate::errors::{AppResult, DatabaseError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling and one-time initialization.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    initialized: Mutex<bool>,
}

impl Database {
    /// Opens or creates the SQLite database at `db_path`.
    ///
    /// The schema is not touched here; it is created on the first call to
    /// [`Database::initialize`] or [`Database::get_conn`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be opened or the
    /// connection pool cannot be built.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_timeout(Duration::from_secs(10))
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        info!("Database opened successfully");
        Ok(Database {
            pool,
            initialized: Mutex::new(false),
        })
    }

    /// Creates tables and seeds default settings.
    ///
    /// Idempotent: calls after the first successful one return immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or seeding fails. A failed
    /// initialization is retried on the next call.
    pub fn initialize(&self) -> AppResult<()> {
        let mut initialized = self
            .initialized
            .lock()
            .map_err(|_| DatabaseError::Custom("initialization lock poisoned".to_string()))?;

        if *initialized {
            debug!("Database already initialized, skipping");
            return Ok(());
        }

        let conn = self.pool.get().map_err(DatabaseError::Pool)?;
        schema::create_tables(&conn)?;
        settings::seed_defaults(&conn)?;
        *initialized = true;

        info!("Database schema initialized");
        Ok(())
    }

    /// True once [`Database::initialize`] has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.initialized.lock().map(|g| *g).unwrap_or(false)
    }

    /// Gets a connection from the pool, initializing the schema first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails or no connection is available.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.initialize()?;
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }
}

/// Connection customizer that sets per-connection SQLite pragmas.
#[derive(Debug)]
struct SqlitePragmas;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        register_functions(conn)
    }

    fn on_release(&self, _conn: Connection) {}
}

/// Registers `fold_case(text)`, a Unicode-aware lower-casing function.
///
/// SQLite's built-in `LOWER` folds ASCII only; search patterns are lowered
/// with [`str::to_lowercase`], so stored text must be folded the same way.
pub(crate) fn register_functions(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// Escapes `%`, `_` and `\` so a user search term matches literally inside
/// a `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_database_open_and_connect() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db3")).unwrap();
        let conn = db.get_conn().unwrap();

        let result: i32 = conn
            .query_row("SELECT 1 + 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, 2);
    }

    #[test]
    fn test_get_conn_initializes_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db3")).unwrap();
        assert!(!db.is_initialized());

        let conn = db.get_conn().unwrap();
        assert!(db.is_initialized());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM app_settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 8);
    }

    #[test]
    fn test_initialize_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db3")).unwrap();

        db.initialize().unwrap();
        db.initialize().unwrap();
    }

    #[test]
    fn test_foreign_keys_enabled_on_every_connection() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db3")).unwrap();
        let conn = db.get_conn().unwrap();

        let enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Work"), "%work%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}

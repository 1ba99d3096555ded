//! DevConnector Storage
//!
//! `SQLite` database layer for DevConnector users, profiles and posts.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each record kind owns its own queries
//!   (`users`, `profiles`, `posts`, `comments`)
//! - **Keyed child rows**: experience, education, comments and likes are rows
//!   keyed by their own id, never by list position
//! - **Atomic mutations**: every read-modify-write begins with its write, so
//!   `SQLite`'s writer lock serializes concurrent toggles
//!
//! # Example
//!
//! ```rust,no_run
//! use devconnector_storage::SqliteStorageContext;
//! use devconnector_core::StorageContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = SqliteStorageContext::connect("sqlite://devconnector.db").await?;
//!
//! let posts = storage.get_all_posts().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod comments;
pub mod posts;
pub mod profiles;
pub mod users;

pub use context::SqliteStorageContext;
pub use error::StorageError;

// Type alias used by the server
pub type Database = SqliteStorageContext;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://devconnector.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}

/// Whether a sqlx error is a UNIQUE constraint violation on `column`
pub(crate) fn is_unique_violation(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation() && db.message().contains(column),
        _ => false,
    }
}

/// Whether a sqlx error is a FOREIGN KEY constraint violation
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}

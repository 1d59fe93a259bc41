//! The versebook database file.
//!
//! Everything versebook keeps between runs lives in one SQLite table,
//! `kv_store`, read and written through [`SqliteStore`](crate::SqliteStore).
//! [`Database`] only owns the pool and brings the schema up to date.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, instrument};

/// Collections are rewritten one at a time, so a couple of connections suffice.
const MAX_CONNECTIONS: u32 = 2;

/// How long a writer waits on a lock held by another versebook process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures opening the database.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("cannot create directory {path} for the database: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open database: {0}")]
    Open(#[from] sqlx::Error),

    #[error("cannot bring database schema up to date: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Pooled handle to the versebook database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database file at `db_path`.
    ///
    /// Missing parent directories are created, so a fresh
    /// `$XDG_DATA_HOME/versebook/versebook.db` works on first run.
    ///
    /// # Errors
    ///
    /// [`DbError::CreateDir`] when the directory cannot be created,
    /// [`DbError::Open`] when SQLite refuses the file, and
    /// [`DbError::Migrate`] when the schema cannot be applied.
    #[instrument(skip(db_path), fields(path = %db_path.display()))]
    pub async fn new(db_path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = db_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| DbError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::migrated(pool).await
    }

    /// A private database that disappears with the handle.
    ///
    /// # Errors
    ///
    /// Same as [`Database::new`], minus directory creation.
    pub async fn new_in_memory() -> Result<Self, DbError> {
        // A single connection, since each in-memory connection is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(SqliteConnectOptions::new().in_memory(true))
            .await?;

        Self::migrated(pool).await
    }

    async fn migrated(pool: SqlitePool) -> Result<Self, DbError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!("database schema up to date");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool. Stores still holding a clone see their writes fail.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn stored(db: &Database, key: &str) -> Option<String> {
        sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_run_creates_data_directory() {
        let home = tempfile::tempdir().unwrap();
        let db_path = home.path().join("share").join("versebook").join("versebook.db");

        let db = Database::new(&db_path).await.unwrap();
        assert!(db_path.exists());

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_reopen_keeps_saved_preferences() {
        let home = tempfile::tempdir().unwrap();
        let db_path = home.path().join("versebook.db");

        let db = Database::new(&db_path).await.unwrap();
        sqlx::query("INSERT INTO kv_store (key, value) VALUES ('language', 'es')")
            .execute(db.pool())
            .await
            .unwrap();
        db.close().await;

        let reopened = Database::new(&db_path).await.unwrap();
        assert_eq!(stored(&reopened, "language").await.as_deref(), Some("es"));
    }

    #[tokio::test]
    async fn test_one_row_per_key() {
        let db = Database::new_in_memory().await.unwrap();
        sqlx::query("INSERT INTO kv_store (key, value) VALUES ('theme', 'light')")
            .execute(db.pool())
            .await
            .unwrap();

        let duplicate = sqlx::query("INSERT INTO kv_store (key, value) VALUES ('theme', 'dark')")
            .execute(db.pool())
            .await;

        assert!(duplicate.is_err());
        assert_eq!(stored(&db, "theme").await.as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_unusable_directory_is_reported() {
        let home = tempfile::tempdir().unwrap();
        let blocker = home.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let error = Database::new(&blocker.join("versebook.db")).await.unwrap_err();
        assert!(matches!(error, DbError::CreateDir { ref path, .. } if *path == blocker));
    }

    #[tokio::test]
    async fn test_closed_handle_rejects_queries() {
        let db = Database::new_in_memory().await.unwrap();
        let shared = db.clone();
        db.close().await;

        let result = sqlx::query("SELECT 1").execute(shared.pool()).await;
        assert!(result.is_err());
    }
}

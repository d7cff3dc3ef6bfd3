//! `SQLite` pool for the device store.
//!
//! The schema is embedded with `sqlx::migrate!` and brought up to date every
//! time the pool is opened.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::StorageError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Writers wait this long for a competing write before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the device store lives.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:zigbridge.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Open the store, creating the file on first run, and migrate it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] for a malformed URL, an unreachable file or a
    /// failing migration.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let database = Database { pool };
        database.migrate().await?;
        tracing::debug!(url = %self.database_url, "device store ready");
        Ok(database)
    }
}

/// An open, migrated device store.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Apply pending migrations; already applied ones are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Migration`] when a migration fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries, then close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

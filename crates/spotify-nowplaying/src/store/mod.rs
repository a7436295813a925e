//! Transactional key/value store shared by the handler loops.
//!
//! Backed by SQLite through `sqlx`: one `kv(key, value)` table. A
//! [`Transaction`] reads committed rows plus its own staged writes; the
//! writes are applied inside a single SQLite transaction on `commit`, and
//! dropping a transaction discards them. No connection or lock is held
//! between statements, so a handler waiting on Spotify never blocks the
//! other loops.

mod records;

pub use records::{TokenStore, state_key, token_key};

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::error::StoreResult;

/// Shared handle to the key/value store.
#[derive(Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    /// Create a store that lives only in memory.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be created.
    pub async fn in_memory() -> StoreResult<Self> {
        // The database lives and dies with its only connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        Self::migrate(pool).await
    }

    /// Open a store backed by a database file, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or migrated.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self::migrate(pool).await?;

        tracing::info!(path = %path.display(), keys = store.len().await?, "Opened store");
        Ok(store)
    }

    async fn migrate(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Start a transaction.
    pub fn begin(&self) -> Transaction<'_> {
        Transaction { pool: &self.pool, writes: BTreeMap::new() }
    }

    /// Number of committed keys.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn len(&self) -> StoreResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv").fetch_one(&self.pool).await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Whether the store holds no committed keys.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len().await? == 0)
    }
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").field("connections", &self.pool.size()).finish()
    }
}

/// An open transaction. Reads see committed data plus this transaction's own writes.
pub struct Transaction<'a> {
    pool: &'a SqlitePool,
    /// `None` marks a pending delete.
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl Transaction<'_> {
    /// Read a raw value.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn get_raw(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(write) = self.writes.get(key) {
            return Ok(write.clone());
        }

        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Stage a raw write.
    pub fn put_raw(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.writes.insert(key.into(), Some(value));
    }

    /// Stage a delete. Deleting a missing key is not an error.
    pub fn delete_raw(&mut self, key: impl Into<String>) {
        self.writes.insert(key.into(), None);
    }

    /// Apply all staged writes atomically.
    ///
    /// # Errors
    ///
    /// Returns error if any write fails; committed data is then left unchanged.
    pub async fn commit(self) -> StoreResult<()> {
        if self.writes.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for (key, write) in &self.writes {
            match write {
                Some(value) => {
                    sqlx::query(
                        "INSERT INTO kv (key, value) VALUES (?, ?) \
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    )
                    .bind(key)
                    .bind(value)
                    .execute(&mut *tx)
                    .await?;
                }
                None => {
                    sqlx::query("DELETE FROM kv WHERE key = ?").bind(key).execute(&mut *tx).await?;
                }
            }
        }
        tx.commit().await?;

        tracing::debug!(writes = self.writes.len(), "Committed store transaction");
        Ok(())
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::{DocumentBackend, DOCUMENT_KEY, MIGRATION_001_KV_STORE};

/// Durable backend keeping the document in a single row of a SQLite table.
///
/// Every write is one upsert statement, so SQLite's own atomicity covers the
/// whole document.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
    key: String,
}

impl SqliteBackend {
    /// Create a backend over an existing pool, using the default document slot.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            key: DOCUMENT_KEY.to_string(),
        }
    }

    /// Use a different slot in the same table.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Open (creating if missing) the database file at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening document database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        Ok(Self::new(pool))
    }

    /// Create the key/value table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_KV_STORE)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a backend (connect + migrate).
    pub async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let backend = Self::connect(path).await?;
        backend.migrate().await?;
        Ok(backend)
    }

    /// When the slot was last written, as stored (RFC 3339).
    pub async fn last_modified(&self) -> Result<Option<String>> {
        let row = sqlx::query("SELECT updated_at FROM kv_store WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read document timestamp")?;

        Ok(row.map(|r| r.get::<String, _>("updated_at")))
    }
}

impl DocumentBackend for SqliteBackend {
    async fn read(&self) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read document")?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    async fn write(&self, blob: &str) -> Result<()> {
        debug!(key = %self.key, bytes = blob.len(), "Writing document");
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.key)
        .bind(blob)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to write document")?;
        Ok(())
    }
}

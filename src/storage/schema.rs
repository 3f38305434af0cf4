use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Storage-layer errors.
///
/// Failing to open the store is fatal for a scrape run; everything after a
/// successful open is recoverable at feed or item granularity.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// A reference category required for resolution is not seeded
    #[error("Category '{0}' is not seeded in the reference store")]
    MissingCategory(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

// ============================================================================
// Database
// ============================================================================

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open a database connection pool and run migrations.
    ///
    /// Pass `":memory:"` for an ephemeral database (tests).
    pub async fn open(path: &str) -> Result<Self, StorageError> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // busy_timeout=5000: SQLite waits up to 5 seconds for locks to release
        // before returning SQLITE_BUSY. Set via pragma so every connection in
        // the pool inherits it.
        let options = SqliteConnectOptions::from_str(&url)?.pragma("busy_timeout", "5000");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate()
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        Ok(db)
    }

    /// Run schema migrations atomically within a transaction.
    ///
    /// All statements use `IF NOT EXISTS`, so re-running on an existing
    /// database is a no-op. If any step fails the whole migration rolls
    /// back, leaving the previous schema intact.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        // Foreign keys are a per-connection setting, outside the transaction
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sources (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                icon TEXT NOT NULL DEFAULT ''
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        // url UNIQUE is the dedup key: an insert that conflicts on url is the
        // AlreadyExists signal, race-free even if scrapes ever run concurrently.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS headlines (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                url TEXT UNIQUE NOT NULL,
                image_url TEXT,
                source_id INTEGER NOT NULL REFERENCES sources(id),
                category_id INTEGER NOT NULL REFERENCES categories(id),
                publish_date INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_headlines_source ON headlines(source_id)")
            .execute(&mut *tx)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_headlines_category ON headlines(category_id)")
            .execute(&mut *tx)
            .await?;
        // Listing pages sort newest-first
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_headlines_published ON headlines(publish_date DESC)",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

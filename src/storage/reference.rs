//! Reference-data resolution and seeding.
//!
//! `sources` and `categories` are static reference entities. The scrape
//! pipeline only resolves them by name; seeding happens at the binary
//! boundary before any scrape runs. A source that cannot be resolved skips
//! its whole feed, a category miss falls back to the default entry.

use super::schema::{Database, StorageError};

impl Database {
    // ========================================================================
    // Seeding (deployment-time, never called by the scrape pipeline)
    // ========================================================================

    /// Seed or refresh category rows. Existing rows keep their id; icons are
    /// updated in place.
    pub async fn seed_categories(&self, categories: &[(&str, &str)]) -> Result<(), StorageError> {
        for (name, icon) in categories {
            sqlx::query(
                r#"
                INSERT INTO categories (name, icon)
                VALUES (?, ?)
                ON CONFLICT(name) DO UPDATE SET icon = excluded.icon
            "#,
            )
            .bind(name)
            .bind(icon)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Seed source rows by name. Existing rows are left untouched.
    pub async fn seed_sources(&self, names: &[&str]) -> Result<(), StorageError> {
        for name in names {
            sqlx::query("INSERT INTO sources (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(name)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Look up a source id by name. `None` means the source is not seeded;
    /// the caller must skip the feed rather than attribute headlines to an
    /// unknown source.
    pub async fn source_id(&self, name: &str) -> Result<Option<i64>, StorageError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM sources WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Look up a category id by name.
    pub async fn category_id(&self, name: &str) -> Result<Option<i64>, StorageError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Resolve a category name to its id, falling back to the default
    /// category when the name is not seeded.
    ///
    /// The classifier only emits names from its own table, so the fallback
    /// should never trigger in a correctly seeded deployment — but an
    /// unexpected miss must not kill the pipeline. Only a missing fallback
    /// row is an error.
    pub async fn resolve_category(
        &self,
        name: &str,
        fallback: &str,
    ) -> Result<i64, StorageError> {
        if let Some(id) = self.category_id(name).await? {
            return Ok(id);
        }
        tracing::warn!(category = %name, fallback = %fallback, "Category not seeded, using fallback");
        self.category_id(fallback)
            .await?
            .ok_or_else(|| StorageError::MissingCategory(fallback.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

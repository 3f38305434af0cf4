//! Headline persistence: the dedup gate and the read surface consumed by the
//! web layer.
//!
//! The pipeline writes through [`Database::insert_headline`] only. Dedup is
//! the UNIQUE constraint on `headlines.url`: a conflicting insert affects no
//! rows, which the gate reports as [`InsertOutcome::AlreadyExists`]. Rows are
//! never updated or deleted here.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::schema::{Database, StorageError};

/// A headline ready to be committed, with pre-resolved reference ids.
#[derive(Debug, Clone)]
pub struct NewHeadline {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub source_id: i64,
    pub category_id: i64,
    pub publish_date: DateTime<Utc>,
}

/// Result of one insert attempt. A duplicate is an expected outcome, counted
/// but never treated as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// A persisted headline joined with its source and category names, as the
/// listing pages consume it.
#[derive(Debug, Clone, FromRow)]
pub struct HeadlineRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub category: String,
    pub category_icon: String,
    pub publish_date: i64,
    pub created_at: i64,
}

const HEADLINE_SELECT: &str = r#"
    SELECT h.id, h.title, h.description, h.url, h.image_url,
           s.name AS source, c.name AS category, c.icon AS category_icon,
           h.publish_date, h.created_at
    FROM headlines h
    JOIN sources s ON h.source_id = s.id
    JOIN categories c ON h.category_id = c.id
"#;

impl Database {
    /// Commit a headline unless its URL is already stored.
    ///
    /// The conflict target is the `url` UNIQUE constraint; `DO NOTHING` plus
    /// `rows_affected` turns the constraint into the AlreadyExists signal
    /// without a separate existence check.
    pub async fn insert_headline(
        &self,
        headline: &NewHeadline,
    ) -> Result<InsertOutcome, StorageError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO headlines
                (title, description, url, image_url, source_id, category_id, publish_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO NOTHING
        "#,
        )
        .bind(&headline.title)
        .bind(&headline.description)
        .bind(&headline.url)
        .bind(&headline.image_url)
        .bind(headline.source_id)
        .bind(headline.category_id)
        .bind(headline.publish_date.timestamp())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    // ========================================================================
    // Read surface (consumed by the web layer, not by the pipeline)
    // ========================================================================

    /// Most recent headlines across all sources, newest publish date first.
    pub async fn recent_headlines(&self, limit: i64) -> Result<Vec<HeadlineRecord>, StorageError> {
        let query = format!(
            "{} ORDER BY h.publish_date DESC, h.created_at DESC LIMIT ?",
            HEADLINE_SELECT
        );
        let rows = sqlx::query_as::<_, HeadlineRecord>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Recent headlines within one category.
    pub async fn headlines_by_category(
        &self,
        category: &str,
        limit: i64,
    ) -> Result<Vec<HeadlineRecord>, StorageError> {
        let query = format!(
            "{} WHERE c.name = ? ORDER BY h.publish_date DESC, h.created_at DESC LIMIT ?",
            HEADLINE_SELECT
        );
        let rows = sqlx::query_as::<_, HeadlineRecord>(&query)
            .bind(category)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Total stored headlines.
    pub async fn headline_count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM headlines")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    async fn seeded_db() -> (Database, i64, i64) {
        let db = Database::open(":memory:").await.unwrap();
        db.seed_sources(&["NDTV"]).await.unwrap();
        db.seed_categories(&[("Politics", "x"), ("General", "y")])
            .await
            .unwrap();
        let source_id = db.source_id("NDTV").await.unwrap().unwrap();
        let category_id = db.category_id("Politics").await.unwrap().unwrap();
        (db, source_id, category_id)
    }

    fn headline(url: &str, source_id: i64, category_id: i64) -> NewHeadline {
        NewHeadline {
            title: "PM announces new policy".to_string(),
            description: "Government unveils plan".to_string(),
            url: url.to_string(),
            image_url: None,
            source_id,
            category_id,
            publish_date: Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_first_insert_reports_inserted() {
        let (db, sid, cid) = seeded_db().await;
        let outcome = db
            .insert_headline(&headline("http://example.com/a1", sid, cid))
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(db.headline_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_url_reports_already_exists() {
        let (db, sid, cid) = seeded_db().await;
        let h = headline("http://example.com/a1", sid, cid);

        assert_eq!(db.insert_headline(&h).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(
            db.insert_headline(&h).await.unwrap(),
            InsertOutcome::AlreadyExists
        );
        assert_eq!(db.headline_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_keeps_original_row() {
        let (db, sid, cid) = seeded_db().await;
        let mut h = headline("http://example.com/a1", sid, cid);
        db.insert_headline(&h).await.unwrap();

        h.title = "Rewritten title".to_string();
        db.insert_headline(&h).await.unwrap();

        let rows = db.recent_headlines(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "PM announces new policy");
    }

    #[tokio::test]
    async fn test_distinct_urls_both_insert() {
        let (db, sid, cid) = seeded_db().await;
        db.insert_headline(&headline("http://example.com/a1", sid, cid))
            .await
            .unwrap();
        db.insert_headline(&headline("http://example.com/a2", sid, cid))
            .await
            .unwrap();
        assert_eq!(db.headline_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_recent_headlines_joins_reference_names() {
        let (db, sid, cid) = seeded_db().await;
        db.insert_headline(&headline("http://example.com/a1", sid, cid))
            .await
            .unwrap();

        let rows = db.recent_headlines(10).await.unwrap();
        assert_eq!(rows[0].source, "NDTV");
        assert_eq!(rows[0].category, "Politics");
        assert_eq!(rows[0].category_icon, "x");
        assert_eq!(rows[0].publish_date, 1672671845);
    }

    #[tokio::test]
    async fn test_recent_headlines_newest_first() {
        let (db, sid, cid) = seeded_db().await;
        let mut older = headline("http://example.com/old", sid, cid);
        older.publish_date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let newer = headline("http://example.com/new", sid, cid);

        db.insert_headline(&older).await.unwrap();
        db.insert_headline(&newer).await.unwrap();

        let rows = db.recent_headlines(10).await.unwrap();
        assert_eq!(rows[0].url, "http://example.com/new");
        assert_eq!(rows[1].url, "http://example.com/old");
    }

    #[tokio::test]
    async fn test_headlines_by_category_filters() {
        let (db, sid, cid) = seeded_db().await;
        let general = db.category_id("General").await.unwrap().unwrap();

        db.insert_headline(&headline("http://example.com/p", sid, cid))
            .await
            .unwrap();
        db.insert_headline(&headline("http://example.com/g", sid, general))
            .await
            .unwrap();

        let politics = db.headlines_by_category("Politics", 10).await.unwrap();
        assert_eq!(politics.len(), 1);
        assert_eq!(politics[0].url, "http://example.com/p");
    }

    #[tokio::test]
    async fn test_image_url_roundtrips_nullable() {
        let (db, sid, cid) = seeded_db().await;
        let mut with_image = headline("http://example.com/img", sid, cid);
        with_image.image_url = Some("http://example.com/a.jpg".to_string());
        db.insert_headline(&with_image).await.unwrap();
        db.insert_headline(&headline("http://example.com/noimg", sid, cid))
            .await
            .unwrap();

        let rows = db.recent_headlines(10).await.unwrap();
        let by_url = |u: &str| rows.iter().find(|r| r.url == u).unwrap().image_url.clone();
        assert_eq!(by_url("http://example.com/img").as_deref(), Some("http://example.com/a.jpg"));
        assert_eq!(by_url("http://example.com/noimg"), None);
    }
}

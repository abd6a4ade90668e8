//! # Category Tag Repository
//!
//! Capability tags attached to catalog categories.

use rigsmith_core::{CapabilityTag, TagSet};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Repository for `category_tags`.
#[derive(Debug, Clone)]
pub struct CategoryTagRepository {
    pool: SqlitePool,
}

impl CategoryTagRepository {
    /// Creates a new CategoryTagRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryTagRepository { pool }
    }

    /// Tags of one category.
    ///
    /// Stored names that are not a known capability are skipped with a
    /// warning, so one stale row can't hide a category's other tags.
    pub async fn for_category(&self, slug: &str) -> DbResult<TagSet> {
        let stored: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT tag
            FROM category_tags
            WHERE category_slug = ?1
            ORDER BY tag
            "#,
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await?;

        let mut tags = TagSet::new();
        for name in stored {
            match CapabilityTag::parse(&name) {
                Some(tag) => {
                    tags.insert(tag);
                }
                None => warn!(category = %slug, tag = %name, "Skipping unknown capability tag"),
            }
        }

        debug!(category = %slug, count = tags.len(), "Loaded category tags");
        Ok(tags)
    }

    /// Attaches tags to a category. Already present tags are left alone.
    pub async fn assign(&self, slug: &str, tags: &[CapabilityTag]) -> DbResult<()> {
        for tag in tags {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO category_tags (category_slug, tag)
                VALUES (?1, ?2)
                "#,
            )
            .bind(slug)
            .bind(tag.as_str())
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Number of distinct tagged categories.
    pub async fn category_count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT category_slug) FROM category_tags")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

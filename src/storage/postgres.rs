//! Postgres backend over the single `portfolio_items` table. Relies on the
//! database's own atomicity for single statements only; the partial update
//! is read-merge-write with no locking (last writer wins).

use async_trait::async_trait;
use sqlx::PgPool;

use super::{PortfolioStore, StorageError};
use crate::db::models::{NewPortfolioItem, PortfolioItem, PortfolioItemPatch};

const COLUMNS: &str =
    "id, title, category, video_url, thumbnail, description, tags, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioStore for PgStore {
    async fn list(&self) -> Result<Vec<PortfolioItem>, StorageError> {
        let items = sqlx::query_as::<_, PortfolioItem>(&format!(
            "SELECT {COLUMNS} FROM portfolio_items ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get(&self, id: i32) -> Result<Option<PortfolioItem>, StorageError> {
        let item = sqlx::query_as::<_, PortfolioItem>(&format!(
            "SELECT {COLUMNS} FROM portfolio_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn create(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StorageError> {
        let created = sqlx::query_as::<_, PortfolioItem>(&format!(
            r#"
            INSERT INTO portfolio_items (title, category, video_url, thumbnail, description, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&item.title)
        .bind(&item.category)
        .bind(&item.video_url)
        .bind(&item.thumbnail)
        .bind(&item.description)
        .bind(&item.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        patch: PortfolioItemPatch,
    ) -> Result<Option<PortfolioItem>, StorageError> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };
        let merged = patch.apply(existing);

        let updated = sqlx::query_as::<_, PortfolioItem>(&format!(
            r#"
            UPDATE portfolio_items
            SET title = $1, category = $2, video_url = $3, thumbnail = $4,
                description = $5, tags = $6, updated_at = now()
            WHERE id = $7
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&merged.title)
        .bind(&merged.category)
        .bind(&merged.video_url)
        .bind(&merged.thumbnail)
        .bind(&merged.description)
        .bind(&merged.tags)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM portfolio_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

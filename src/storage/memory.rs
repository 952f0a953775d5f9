//! In-memory backend: a seeded vector behind an async lock. State lives for
//! the process lifetime only; last writer wins.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{next_id, PortfolioStore, StorageError};
use crate::db::models::{seed_item, NewPortfolioItem, PortfolioItem, PortfolioItemPatch};

pub struct MemoryStore {
    items: RwLock<Vec<PortfolioItem>>,
}

impl MemoryStore {
    pub fn new(items: Vec<PortfolioItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Start with the same sample record the other backends seed with.
    pub fn seeded() -> Self {
        let seed = seed_item();
        Self::new(vec![PortfolioItem {
            id: 1,
            title: seed.title,
            category: seed.category,
            video_url: seed.video_url,
            thumbnail: seed.thumbnail,
            description: seed.description,
            tags: seed.tags,
            created_at: Some(Utc::now()),
            updated_at: None,
        }])
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn list(&self) -> Result<Vec<PortfolioItem>, StorageError> {
        let items = self.items.read().await;
        let mut items = items.clone();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn get(&self, id: i32) -> Result<Option<PortfolioItem>, StorageError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn create(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StorageError> {
        let mut items = self.items.write().await;
        let created = PortfolioItem {
            id: next_id(&items),
            title: item.title,
            category: item.category,
            video_url: item.video_url,
            thumbnail: item.thumbnail,
            description: item.description,
            tags: item.tags,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        items.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        patch: PortfolioItemPatch,
    ) -> Result<Option<PortfolioItem>, StorageError> {
        let mut items = self.items.write().await;
        let Some(index) = items.iter().position(|item| item.id == id) else {
            return Ok(None);
        };
        let updated = patch.apply(items[index].clone());
        items[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, StorageError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }
}

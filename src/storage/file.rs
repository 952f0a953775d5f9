//! JSON-file backend: a single array at a fixed path, read and rewritten
//! whole on every operation. The first read of a missing file creates it
//! with one seed record. Concurrent writers are not guarded against; two
//! simultaneous saves can lose one of the updates.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use super::{next_id, PortfolioStore, StorageError};
use crate::db::models::{seed_item, NewPortfolioItem, PortfolioItem, PortfolioItemPatch};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(&self) -> Result<Vec<PortfolioItem>, StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if !self.path.exists() {
            let seed = seed_item();
            let items = vec![PortfolioItem {
                id: 1,
                title: seed.title,
                category: seed.category,
                video_url: seed.video_url,
                thumbnail: seed.thumbnail,
                description: seed.description,
                tags: seed.tags,
                created_at: Some(Utc::now()),
                updated_at: None,
            }];
            self.save(&items).await?;
            tracing::info!(path = %self.path.display(), "Created portfolio data file with seed record");
            return Ok(items);
        }

        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn save(&self, items: &[PortfolioItem]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(items)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl PortfolioStore for FileStore {
    async fn list(&self) -> Result<Vec<PortfolioItem>, StorageError> {
        let mut items = self.load().await?;
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn get(&self, id: i32) -> Result<Option<PortfolioItem>, StorageError> {
        let items = self.load().await?;
        Ok(items.into_iter().find(|item| item.id == id))
    }

    async fn create(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StorageError> {
        let mut items = self.load().await?;
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
        self.save(&items).await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        patch: PortfolioItemPatch,
    ) -> Result<Option<PortfolioItem>, StorageError> {
        let mut items = self.load().await?;
        let Some(index) = items.iter().position(|item| item.id == id) else {
            return Ok(None);
        };
        let updated = patch.apply(items[index].clone());
        items[index] = updated.clone();
        self.save(&items).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, StorageError> {
        let mut items = self.load().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(title: &str) -> NewPortfolioItem {
        NewPortfolioItem {
            title: title.to_string(),
            category: "Events".to_string(),
            video_url: "https://x/v.mp4".to_string(),
            thumbnail: "https://x/t.jpg".to_string(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_first_list_creates_file_with_seed_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let store = FileStore::new(&path);

        assert!(!path.exists());
        let items = store.list().await.unwrap();
        assert!(path.exists());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Adventure in Paradise");
    }

    #[tokio::test]
    async fn test_create_persists_across_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");

        let created = FileStore::new(&path).create(new_item("Campaign")).await.unwrap();
        assert_eq!(created.id, 2); // seed took id 1

        let reread = FileStore::new(&path);
        let items = reread.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Campaign");
    }

    #[tokio::test]
    async fn test_update_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("portfolio.json"));

        let patch = PortfolioItemPatch {
            tags: Some(vec!["beach".to_string()]),
            ..PortfolioItemPatch::default()
        };
        let updated = store.update(1, patch).await.unwrap().unwrap();
        assert_eq!(updated.tags, vec!["beach".to_string()]);

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.list().await,
            Err(StorageError::Corrupt(_))
        ));
    }
}

//! Portfolio persistence: one façade over three interchangeable backends.
//!
//! The backend is selected once at startup and is static for the process
//! lifetime, except that a failed Postgres connectivity probe downgrades to
//! file storage. When the Postgres backend errors mid-operation the façade
//! logs and retries the same operation against the file backend; this is
//! best-effort fallback, not replication - the stores are never reconciled.

pub mod file;
pub mod memory;
pub mod migrate;
pub mod postgres;

use async_trait::async_trait;

use crate::config::{AppConfig, StorageMode};
use crate::db::models::{NewPortfolioItem, PortfolioItem, PortfolioItemPatch};
use file::FileStore;
use memory::MemoryStore;
use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("data file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Capability interface implemented by every concrete backend.
///
/// Ordinary not-found cases are `Ok(None)` / `Ok(false)`, never errors.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn list(&self) -> Result<Vec<PortfolioItem>, StorageError>;
    async fn get(&self, id: i32) -> Result<Option<PortfolioItem>, StorageError>;
    async fn create(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StorageError>;
    async fn update(
        &self,
        id: i32,
        patch: PortfolioItemPatch,
    ) -> Result<Option<PortfolioItem>, StorageError>;
    async fn delete(&self, id: i32) -> Result<bool, StorageError>;
}

enum Backend {
    Memory(MemoryStore),
    File(FileStore),
    Postgres { primary: PgStore, fallback: FileStore },
}

pub struct Storage {
    backend: Backend,
}

impl Storage {
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::seeded()),
        }
    }

    pub fn file(store: FileStore) -> Self {
        Self {
            backend: Backend::File(store),
        }
    }

    pub fn postgres(primary: PgStore, fallback: FileStore) -> Self {
        Self {
            backend: Backend::Postgres { primary, fallback },
        }
    }

    /// Resolve the backend from configuration. For Postgres this runs the
    /// connectivity probe (bounded by `db_probe_timeout_secs`), the schema
    /// migrations, and the one-shot legacy import; any failure downgrades
    /// to file storage for the remainder of the process.
    pub async fn init(config: &AppConfig) -> Self {
        match config.storage_mode {
            StorageMode::InMemory => {
                tracing::info!("Using in-memory portfolio storage");
                Self::memory()
            }
            StorageMode::File => {
                tracing::info!(path = %config.data_file.display(), "Using file portfolio storage");
                Self::file(FileStore::new(&config.data_file))
            }
            StorageMode::Postgres => Self::init_postgres(config).await,
        }
    }

    async fn init_postgres(config: &AppConfig) -> Self {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("Postgres storage selected but DATABASE_URL is not set; using file storage");
            return Self::file(FileStore::new(&config.data_file));
        };

        let db_config = crate::db::DbConfig::new(url);
        let probe = std::time::Duration::from_secs(config.db_probe_timeout_secs);
        let pool = match tokio::time::timeout(probe, crate::db::init_pool(&db_config)).await {
            Ok(Ok(pool)) => pool,
            Ok(Err(e)) => {
                tracing::warn!("Database connectivity probe failed: {}. Downgrading to file storage.", e);
                return Self::file(FileStore::new(&config.data_file));
            }
            Err(_) => {
                tracing::warn!(
                    "Database connectivity probe timed out after {}s. Downgrading to file storage.",
                    config.db_probe_timeout_secs
                );
                return Self::file(FileStore::new(&config.data_file));
            }
        };

        if let Err(e) = crate::db::run_migrations(&pool).await {
            tracing::warn!("Failed to run database migrations: {}. Downgrading to file storage.", e);
            return Self::file(FileStore::new(&config.data_file));
        }

        let primary = PgStore::new(pool);
        if let Err(e) = migrate::import_legacy(&primary, &config.data_file).await {
            tracing::error!("Legacy portfolio import failed: {}", e);
        }

        tracing::info!("Using Postgres portfolio storage with file fallback");
        Self::postgres(primary, FileStore::new(&config.data_file))
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::Memory(_) => "memory",
            Backend::File(_) => "file",
            Backend::Postgres { .. } => "postgres",
        }
    }

    pub async fn list(&self) -> Result<Vec<PortfolioItem>, StorageError> {
        match &self.backend {
            Backend::Memory(store) => store.list().await,
            Backend::File(store) => store.list().await,
            Backend::Postgres { primary, fallback } => match primary.list().await {
                Ok(items) => Ok(items),
                Err(e) => {
                    tracing::error!("Error fetching portfolio items: {}. Retrying on file store.", e);
                    fallback.list().await
                }
            },
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<PortfolioItem>, StorageError> {
        match &self.backend {
            Backend::Memory(store) => store.get(id).await,
            Backend::File(store) => store.get(id).await,
            Backend::Postgres { primary, fallback } => match primary.get(id).await {
                Ok(item) => Ok(item),
                Err(e) => {
                    tracing::error!("Error fetching portfolio item {}: {}. Retrying on file store.", id, e);
                    fallback.get(id).await
                }
            },
        }
    }

    pub async fn create(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StorageError> {
        match &self.backend {
            Backend::Memory(store) => store.create(item).await,
            Backend::File(store) => store.create(item).await,
            Backend::Postgres { primary, fallback } => match primary.create(item.clone()).await {
                Ok(created) => Ok(created),
                Err(e) => {
                    tracing::error!("Error creating portfolio item: {}. Retrying on file store.", e);
                    fallback.create(item).await
                }
            },
        }
    }

    pub async fn update(
        &self,
        id: i32,
        patch: PortfolioItemPatch,
    ) -> Result<Option<PortfolioItem>, StorageError> {
        match &self.backend {
            Backend::Memory(store) => store.update(id, patch).await,
            Backend::File(store) => store.update(id, patch).await,
            Backend::Postgres { primary, fallback } => {
                match primary.update(id, patch.clone()).await {
                    Ok(item) => Ok(item),
                    Err(e) => {
                        tracing::error!("Error updating portfolio item {}: {}. Retrying on file store.", id, e);
                        fallback.update(id, patch).await
                    }
                }
            }
        }
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StorageError> {
        match &self.backend {
            Backend::Memory(store) => store.delete(id).await,
            Backend::File(store) => store.delete(id).await,
            Backend::Postgres { primary, fallback } => match primary.delete(id).await {
                Ok(deleted) => Ok(deleted),
                Err(e) => {
                    tracing::error!("Error deleting portfolio item {}: {}. Retrying on file store.", id, e);
                    fallback.delete(id).await
                }
            },
        }
    }
}

/// Assign the next id: one past the largest existing id, starting at 1.
pub(crate) fn next_id(items: &[PortfolioItem]) -> i32 {
    items.iter().map(|item| item.id).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::seed_item;

    #[tokio::test]
    async fn test_memory_facade_round_trip() {
        let storage = Storage::memory();
        assert_eq!(storage.backend_name(), "memory");

        let created = storage
            .create(NewPortfolioItem {
                title: "Launch Reel".to_string(),
                ..seed_item()
            })
            .await
            .unwrap();
        assert!(created.id > 1);

        let fetched = storage.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Launch Reel");

        assert!(storage.delete(created.id).await.unwrap());
        assert!(storage.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_init_selects_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::AppConfig {
            data_file: dir.path().join("portfolio.json"),
            ..crate::config::AppConfig::default()
        };
        let storage = Storage::init(&config).await;
        assert_eq!(storage.backend_name(), "file");
    }

    #[tokio::test]
    async fn test_init_postgres_without_url_downgrades_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::AppConfig {
            storage_mode: crate::config::StorageMode::Postgres,
            database_url: None,
            data_file: dir.path().join("portfolio.json"),
            ..crate::config::AppConfig::default()
        };
        let storage = Storage::init(&config).await;
        assert_eq!(storage.backend_name(), "file");
    }

    #[test]
    fn test_next_id_is_max_plus_one() {
        assert_eq!(next_id(&[]), 1);

        let mut item: PortfolioItem = serde_json::from_str(
            r#"{"id":7,"title":"T","category":"C","videoUrl":"v","thumbnail":"t"}"#,
        )
        .unwrap();
        let mut other = item.clone();
        other.id = 3;
        item.id = 7;
        assert_eq!(next_id(&[other, item]), 8);
    }
}

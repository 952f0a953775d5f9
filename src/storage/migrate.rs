//! One-shot import of the legacy JSON data file into an empty store.
//!
//! Runs once from startup for the relational backend. Records are
//! re-inserted as fresh creates (new ids and timestamps, same business
//! fields); concurrent writes during the import are not guarded.

use std::path::Path;

use crate::db::models::{seed_item, NewPortfolioItem, PortfolioItem};

use super::{PortfolioStore, StorageError};

/// Import legacy records into `store`. Skips entirely when the store
/// already has rows, so re-running performs no inserts. Returns the number
/// of records inserted.
pub async fn import_legacy(
    store: &dyn PortfolioStore,
    legacy_path: &Path,
) -> Result<usize, StorageError> {
    let existing = store.list().await?;
    if !existing.is_empty() {
        tracing::info!(
            count = existing.len(),
            "Store already has portfolio items, skipping migration"
        );
        return Ok(0);
    }

    if legacy_path.exists() {
        let raw = tokio::fs::read_to_string(legacy_path).await?;
        let items: Vec<PortfolioItem> = serde_json::from_str(&raw)?;

        tracing::info!(count = items.len(), path = %legacy_path.display(), "Migrating legacy portfolio items");
        let mut inserted = 0;
        for item in items {
            store
                .create(NewPortfolioItem {
                    title: item.title,
                    category: item.category,
                    video_url: item.video_url,
                    thumbnail: item.thumbnail,
                    description: item.description,
                    tags: item.tags,
                })
                .await?;
            inserted += 1;
        }
        tracing::info!(inserted, "Portfolio data migration completed");
        Ok(inserted)
    } else {
        tracing::info!("No legacy data file found, creating seed record");
        store.create(seed_item()).await?;
        Ok(1)
    }
}

//! Database models - structs representing the portfolio table (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single domain entity: one portfolio gallery entry.
///
/// `id` is assigned by the backend on creation and never changes;
/// `created_at`/`updated_at` are backend-set.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub video_url: String,
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for creating an item. Callers must have validated the required
/// fields as non-empty before this reaches a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioItem {
    pub title: String,
    pub category: String,
    pub video_url: String,
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update: only supplied fields overwrite, everything else is
/// retained as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItemPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PortfolioItemPatch {
    /// Merge this patch into an existing item, stamping `updated_at`.
    pub fn apply(self, mut item: PortfolioItem) -> PortfolioItem {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(video_url) = self.video_url {
            item.video_url = video_url;
        }
        if let Some(thumbnail) = self.thumbnail {
            item.thumbnail = thumbnail;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        item.updated_at = Some(Utc::now());
        item
    }
}

/// The record inserted when a store starts out empty.
pub fn seed_item() -> NewPortfolioItem {
    NewPortfolioItem {
        title: "Adventure in Paradise".to_string(),
        category: "Travel & Lifestyle".to_string(),
        video_url: "https://player.vimeo.com/external/368763065.sd.mp4".to_string(),
        thumbnail: "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?q=80&w=1000"
            .to_string(),
        description: "Exploring hidden beaches and tropical destinations".to_string(),
        tags: vec![
            "travel".to_string(),
            "nature".to_string(),
            "adventure".to_string(),
        ],
    }
}

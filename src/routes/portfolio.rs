/**
 * Portfolio Routes
 * CRUD API endpoints for portfolio gallery entries
 */
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::db::models::{NewPortfolioItem, PortfolioItemPatch};
use crate::routes::auth::AdminUser;
use crate::routes::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for GET/DELETE /api/portfolio
#[derive(Debug, Deserialize)]
pub struct PortfolioQuery {
    pub id: Option<i32>,
}

/// Request body for POST /api/portfolio. All fields default so that a
/// missing field is reported as a validation error rather than a
/// deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortfolioRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for PUT /api/portfolio: the target id plus the fields to
/// overwrite; absent fields retain their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdatePortfolioRequest {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(flatten)]
    pub patch: PortfolioItemPatch,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/portfolio[?id=...]
/// Public: the whole collection, or a single item when `id` is given.
pub async fn list(State(state): State<AppState>, Query(query): Query<PortfolioQuery>) -> Response {
    if let Some(id) = query.id {
        return match state.storage.get(id).await {
            Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
            Ok(None) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Item not found")),
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Error fetching portfolio item {}: {}", id, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to fetch portfolio item")),
                )
                    .into_response()
            }
        };
    }

    match state.storage.list().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => {
            tracing::error!("Error fetching portfolio items: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to fetch portfolio items")),
            )
                .into_response()
        }
    }
}

/// POST /api/portfolio (admin)
/// Create a new item; title, category, videoUrl and thumbnail are required.
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePortfolioRequest>,
) -> Response {
    if payload.title.trim().is_empty()
        || payload.video_url.trim().is_empty()
        || payload.thumbnail.trim().is_empty()
        || payload.category.trim().is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required fields")),
        )
            .into_response();
    }

    let item = NewPortfolioItem {
        title: payload.title,
        category: payload.category,
        video_url: payload.video_url,
        thumbnail: payload.thumbnail,
        description: payload.description,
        tags: payload.tags,
    };

    match state.storage.create(item).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => {
            tracing::error!("Error creating portfolio item: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to create portfolio item")),
            )
                .into_response()
        }
    }
}

/// PUT /api/portfolio (admin)
/// Partial update by id: supplied fields overwrite, others are retained.
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePortfolioRequest>,
) -> Response {
    let Some(id) = payload.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing ID field")),
        )
            .into_response();
    };

    match state.storage.update(id, payload.patch).await {
        Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Item not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error updating portfolio item {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to update portfolio item")),
            )
                .into_response()
        }
    }
}

/// DELETE /api/portfolio?id=... (admin)
pub async fn remove(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PortfolioQuery>,
) -> Response {
    let Some(id) = query.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing ID parameter")),
        )
            .into_response();
    };

    match state.storage.delete(id).await {
        Ok(true) => (StatusCode::OK, Json(SuccessResponse { success: true })).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Item not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error deleting portfolio item {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to delete portfolio item")),
            )
                .into_response()
        }
    }
}

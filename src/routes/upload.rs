/**
 * Upload Routes
 * Multipart media upload plus a raw direct-upload fallback for large files
 */
use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::routes::auth::AdminUser;
use crate::routes::ErrorResponse;
use crate::state::AppState;

const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_VIDEO_SIZE: usize = 100 * 1024 * 1024; // 100MB

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
const ALLOWED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub file_name: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct DirectUploadResponse {
    pub success: bool,
    pub url: String,
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct DirectUploadQuery {
    pub path: Option<String>,
}

fn bad_request(error: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error))).into_response()
}

/// Build the stored file name: millisecond timestamp plus the first 20
/// characters of the client name with anything non-alphanumeric replaced.
fn build_file_name(original: &str, timestamp_ms: i64) -> String {
    let ext = original.rsplit('.').next().unwrap_or("").to_lowercase();
    let base: String = original
        .chars()
        .take(20)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{timestamp_ms}-{base}.{ext}")
}

/// Reject path traversal in client-supplied storage paths. Subdirectories
/// are allowed, escaping the upload root is not.
fn is_safe_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains("..")
        && !path.contains('\\')
        && !path.contains('\0')
}

/// POST /api/upload (admin)
/// Multipart upload with a `file` part and a `type` part ("image" or
/// "video"). Validates the declared type, MIME type and size ceiling, then
/// stores the blob under `{type}s/` and returns its public URL.
pub async fn upload(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut kind: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Multipart error: {}", e);
                return bad_request("Invalid multipart data");
            }
        };

        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("unknown").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => {
                        tracing::error!("Failed to read upload bytes: {}", e);
                        return bad_request("Failed to read file data");
                    }
                };
                file = Some((name, content_type, bytes));
            }
            Some("type") => {
                kind = field.text().await.ok();
            }
            _ => {}
        }
    }

    let Some((original_name, content_type, bytes)) = file else {
        return bad_request("No file uploaded");
    };

    let kind = kind.unwrap_or_default();
    if kind != "image" && kind != "video" {
        return bad_request("Invalid file type. Must be \"video\" or \"image\"");
    }

    let (max_size, allowed, limit_label) = if kind == "image" {
        (MAX_IMAGE_SIZE, ALLOWED_IMAGE_TYPES, "10MB")
    } else {
        (MAX_VIDEO_SIZE, ALLOWED_VIDEO_TYPES, "100MB")
    };

    if bytes.len() > max_size {
        return bad_request(format!("File too large. Maximum size is {limit_label}"));
    }

    if !allowed.contains(&content_type.as_str()) {
        return bad_request(format!(
            "Invalid file type. Allowed types for {} are: {}",
            kind,
            allowed.join(", ")
        ));
    }

    let file_name = build_file_name(&original_name, Utc::now().timestamp_millis());
    let key = format!("{kind}s/{file_name}");

    match state.blobs.put(&key, &content_type, bytes).await {
        Ok(url) => {
            tracing::info!(key = %key, "File uploaded");
            (
                StatusCode::OK,
                Json(UploadResponse {
                    url,
                    file_name,
                    success: true,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error uploading file: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to upload file")),
            )
                .into_response()
        }
    }
}

/// PUT /api/upload/direct?path=... (admin)
/// Raw-body upload to an explicit path under the upload root. Used by the
/// admin UI as a fallback when multipart encoding is not practical.
pub async fn direct_upload(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<DirectUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(path) = query.path else {
        return bad_request("Missing file path");
    };

    if !is_safe_path(&path) {
        return bad_request("Invalid file path");
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    match state.blobs.put(&path, content_type, body).await {
        Ok(url) => {
            tracing::info!(path = %path, "Direct upload stored");
            (
                StatusCode::OK,
                Json(DirectUploadResponse {
                    success: true,
                    url,
                    path,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error in direct upload: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to upload file directly")),
            )
                .into_response()
        }
    }
}

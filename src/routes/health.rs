/**
 * Health Routes
 * Endpoints for checking backend health status
 */
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::state::AppState;

/// Single service check result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Detailed health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: u64,
    pub environment: String,
    pub checks: HealthChecks,
}

/// Health checks for backing services
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub storage: StorageCheck,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCheck {
    pub backend: String,
    #[serde(flatten)]
    pub check: ServiceCheck,
}

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: String,
}

/// GET /health - Simple health ping
pub async fn health_ping() -> impl IntoResponse {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /health/detailed - uptime plus a live check of the active storage
/// backend. Returns 503 when storage is unreachable.
pub async fn health_detailed(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.started_at.elapsed().as_secs();

    let started = Instant::now();
    let storage_check = match state.storage.list().await {
        Ok(_) => StorageCheck {
            backend: state.storage.backend_name().to_string(),
            check: ServiceCheck {
                status: "healthy".to_string(),
                response_time: Some(started.elapsed().as_millis() as u64),
                error: None,
            },
        },
        Err(e) => StorageCheck {
            backend: state.storage.backend_name().to_string(),
            check: ServiceCheck {
                status: "unhealthy".to_string(),
                response_time: None,
                error: Some(e.to_string()),
            },
        },
    };

    let healthy = storage_check.check.status == "healthy";
    let response = DetailedHealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now(),
        uptime,
        environment: state.config.environment.clone(),
        checks: HealthChecks {
            storage: storage_check,
        },
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testutil::test_state;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn health_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_ping))
            .route("/health/detailed", get(health_detailed))
            .with_state(state)
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_ping() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let res = health_router(test_state(dir.path())).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_detailed_reports_storage_backend() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::get("/health/detailed").body(Body::empty()).unwrap();
        let res = health_router(test_state(dir.path())).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["checks"]["storage"]["backend"], "memory");
        assert_eq!(json["checks"]["storage"]["status"], "healthy");
        assert!(json["uptime"].is_u64());
    }
}

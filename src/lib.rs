//! Agency Backend - library for app logic and testing

pub mod blob;
pub mod config;
pub mod db;
pub mod logging;
pub mod mailer;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use config::AppConfig;
use state::AppState;

/// Configure CORS from the resolved configuration. The browser admin UI
/// sends the auth cookie cross-origin, so credentials must be allowed.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors(&state.config);
    tracing::info!("CORS configured");

    // Locally stored uploads are served straight from disk; when blobs go
    // to S3 the returned URLs bypass this route entirely.
    let serve_uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/verify", get(routes::auth::verify))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route(
            "/api/portfolio",
            get(routes::portfolio::list)
                .post(routes::portfolio::create)
                .put(routes::portfolio::update)
                .delete(routes::portfolio::remove),
        )
        // Upload bodies are size-checked per media kind in the handlers, so
        // the default body cap is lifted on these two routes only.
        .route(
            "/api/upload",
            post(routes::upload::upload).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/api/upload/direct",
            put(routes::upload::direct_upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/contact", post(routes::contact::submit))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .nest_service("/uploads", serve_uploads)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    let config = AppConfig::from_env();
    config.enforce_production_safety();

    let storage = storage::Storage::init(&config).await;
    let blobs = blob::BlobStore::from_config(&config).await;
    let mailer = mailer::Mailer::from_config(&config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT configuration");

    let state = AppState::new(config, storage, blobs, mailer);
    let app = create_app(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_full_app_serves_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_app(routes::testutil::test_state(dir.path()));

        let req = Request::get("/health").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_full_app_serves_portfolio_without_auth() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_app(routes::testutil::test_state(dir.path()));

        let req = Request::get("/api/portfolio").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_full_app_serves_uploaded_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/a.jpg"), b"jpeg").unwrap();

        let state = routes::testutil::test_state(dir.path());
        let app = create_app(state);

        let req = Request::get("/uploads/images/a.jpg")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

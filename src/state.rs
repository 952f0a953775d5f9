//! Application context: built once in `run()` and injected into handlers
//! via axum `State` instead of module-level globals.

use std::sync::Arc;
use std::time::Instant;

use crate::blob::BlobStore;
use crate::config::AppConfig;
use crate::mailer::Mailer;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<Storage>,
    pub blobs: Arc<BlobStore>,
    pub mailer: Arc<Mailer>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Storage, blobs: BlobStore, mailer: Mailer) -> Self {
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            blobs: Arc::new(blobs),
            mailer: Arc::new(mailer),
            started_at: Instant::now(),
        }
    }
}

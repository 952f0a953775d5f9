/**
 * Routes Module
 * API route handlers
 */
pub mod auth;
pub mod contact;
pub mod health;
pub mod portfolio;
pub mod upload;

use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint: one human-readable error line.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::blob::BlobStore;
    use crate::config::AppConfig;
    use crate::mailer::Mailer;
    use crate::state::AppState;
    use crate::storage::Storage;

    /// State for router tests: memory-backed storage, blobs in a temp dir,
    /// unconfigured mailer, default (dev) config.
    pub fn test_state(upload_root: &std::path::Path) -> AppState {
        let config = AppConfig {
            upload_dir: upload_root.to_path_buf(),
            ..AppConfig::default()
        };
        let mailer = Mailer::from_config(&config);
        AppState::new(
            config,
            Storage::memory(),
            BlobStore::local(upload_root),
            mailer,
        )
    }
}

//! Media blob storage for uploaded files: S3 when a bucket is configured,
//! local disk otherwise. Either way `put` returns the public URL clients
//! embed in portfolio entries.

use std::path::PathBuf;

use axum::body::Bytes;

use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("object storage error: {0}")]
    Remote(String),
}

pub enum BlobStore {
    Local {
        root: PathBuf,
        public_base: String,
    },
    S3 {
        client: aws_sdk_s3::Client,
        bucket: String,
        public_base: String,
    },
}

impl BlobStore {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::Local {
            root: root.into(),
            public_base: "/uploads".to_string(),
        }
    }

    pub async fn from_config(config: &AppConfig) -> Self {
        match &config.s3_bucket {
            Some(bucket) => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let client = aws_sdk_s3::Client::new(&aws_config);
                let public_base = config
                    .s3_public_base
                    .clone()
                    .unwrap_or_else(|| format!("https://{bucket}.s3.amazonaws.com"));
                tracing::info!(bucket = %bucket, "Using S3 blob storage");
                Self::S3 {
                    client,
                    bucket: bucket.clone(),
                    public_base,
                }
            }
            None => {
                tracing::info!(dir = %config.upload_dir.display(), "Using local blob storage");
                Self::local(&config.upload_dir)
            }
        }
    }

    /// Store a blob under `key` (a relative path like `images/169...-promo.jpg`)
    /// and return its public URL.
    pub async fn put(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, BlobError> {
        match self {
            Self::Local { root, public_base } => {
                let path = root.join(key);
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&path, &data).await?;
                Ok(format!("{}/{}", public_base.trim_end_matches('/'), key))
            }
            Self::S3 {
                client,
                bucket,
                public_base,
            } => {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .content_type(content_type)
                    .body(aws_sdk_s3::primitives::ByteStream::from(data))
                    .send()
                    .await
                    .map_err(|e| BlobError::Remote(e.to_string()))?;
                Ok(format!("{}/{}", public_base.trim_end_matches('/'), key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_put_writes_file_and_returns_relative_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::local(dir.path());

        let url = store
            .put("images/test.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();

        assert_eq!(url, "/uploads/images/test.png");
        let written = std::fs::read(dir.path().join("images/test.png")).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn test_local_put_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::local(dir.path());

        store
            .put("videos/deep/clip.mp4", "video/mp4", Bytes::from_static(b"v"))
            .await
            .unwrap();
        assert!(dir.path().join("videos/deep/clip.mp4").exists());
    }
}

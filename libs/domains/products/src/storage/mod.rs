//! File storage behind the product upload pipeline.
//!
//! [`FileStorage`] is implemented by [`S3FileStorage`] for deployments and by
//! [`LocalFileStorage`] for local development and tests. Which one the API
//! runs with is chosen by [`StorageConfig`].

mod config;
mod local;
mod s3;
mod thumbnail;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use config::{LocalStorageConfig, S3StorageConfig, StorageConfig};
pub use local::LocalFileStorage;
pub use s3::S3FileStorage;
pub use thumbnail::{render_thumbnail, THUMBNAIL_SIZE};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Not a decodable image: {0}")]
    InvalidImage(String),

    #[error("URL does not belong to this storage: {0}")]
    ForeignUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A file received from a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
                .to_string(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store the file and return its public URL
    async fn upload_file(&self, file: &UploadedFile) -> StorageResult<String>;

    /// Store a JPEG thumbnail of the image and return its public URL
    async fn create_thumbnail(&self, file: &UploadedFile) -> StorageResult<String>;

    /// Remove a file previously returned by this storage
    async fn delete_file(&self, url: &str) -> StorageResult<()>;
}

/// Build the backend selected by the configuration
pub async fn build_storage(config: &StorageConfig) -> Arc<dyn FileStorage> {
    match config {
        StorageConfig::S3(s3) => Arc::new(S3FileStorage::new(s3).await),
        StorageConfig::Local(local) => Arc::new(LocalFileStorage::new(local)),
    }
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`, drop any directories
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `uploads/{unix_ms}-{nonce}-{name}`
pub(crate) fn upload_key(file_name: &str) -> String {
    format!("uploads/{}-{}", key_prefix(), sanitize_file_name(file_name))
}

/// `thumbnails/{unix_ms}-{nonce}-{stem}.jpg`
pub(crate) fn thumbnail_key(file_name: &str) -> String {
    let sanitized = sanitize_file_name(file_name);
    let stem = Path::new(&sanitized)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("thumbnail");
    format!("thumbnails/{}-{}.jpg", key_prefix(), stem)
}

fn key_prefix() -> String {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", chrono::Utc::now().timestamp_millis(), &nonce[..8])
}

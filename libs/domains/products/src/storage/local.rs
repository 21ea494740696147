use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::thumbnail::render_thumbnail_blocking;
use super::{
    thumbnail_key, upload_key, FileStorage, LocalStorageConfig, StorageError, StorageResult,
    UploadedFile,
};

/// Stores files on disk under `root`, addressed by `{base_url}/{key}`
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(config: &LocalStorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, key: &str, bytes: &Bytes) -> StorageResult<String> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "Stored file");
        Ok(format!("{}/{}", self.base_url, key))
    }

    /// Map a URL back to a path inside `root`, refusing anything that escapes it
    fn path_for(&self, url: &str) -> StorageResult<PathBuf> {
        let key = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn upload_file(&self, file: &UploadedFile) -> StorageResult<String> {
        self.write(&upload_key(&file.file_name), &file.bytes).await
    }

    async fn create_thumbnail(&self, file: &UploadedFile) -> StorageResult<String> {
        let jpeg = render_thumbnail_blocking(file.bytes.clone()).await?;
        self.write(&thumbnail_key(&file.file_name), &jpeg).await
    }

    async fn delete_file(&self, url: &str) -> StorageResult<()> {
        let path = self.path_for(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete(format!("{}: {}", path.display(), e))),
        }
    }
}

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use tracing::{debug, info};

use super::thumbnail::render_thumbnail_blocking;
use super::{
    thumbnail_key, upload_key, FileStorage, S3StorageConfig, StorageError, StorageResult,
    UploadedFile,
};

/// Public-read bucket on AWS S3 or an S3-compatible service
#[derive(Debug, Clone)]
pub struct S3FileStorage {
    client: Client,
    bucket: String,
    endpoint: Option<String>,
}

impl S3FileStorage {
    /// Credentials come from the default AWS provider chain
    pub async fn new(config: &S3StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let client = if config.endpoint_url.is_some() {
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(true)
                .build();
            Client::from_conf(s3_config)
        } else {
            Client::new(&sdk_config)
        };

        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint_url,
            "S3 file storage ready"
        );

        Self {
            client,
            bucket: config.bucket.clone(),
            endpoint: config.endpoint_url.as_ref().map(|e| e.trim_end_matches('/').to_string()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        public_url(&self.bucket, self.endpoint.as_deref(), key)
    }

    async fn put(&self, key: String, file: &UploadedFile, body: bytes::Bytes) -> StorageResult<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body.into())
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("{}: {}", key, e)))?;

        debug!(bucket = %self.bucket, key = %key, "Uploaded object");
        Ok(self.public_url(&key))
    }
}

fn public_url(bucket: &str, endpoint: Option<&str>, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint, bucket, key),
        None => format!("https://{}.s3.amazonaws.com/{}", bucket, key),
    }
}

fn key_from_url<'a>(bucket: &str, endpoint: Option<&str>, url: &'a str) -> Option<&'a str> {
    let prefix = public_url(bucket, endpoint, "");
    url.strip_prefix(prefix.as_str()).filter(|key| !key.is_empty())
}

#[async_trait]
impl FileStorage for S3FileStorage {
    async fn upload_file(&self, file: &UploadedFile) -> StorageResult<String> {
        self.put(upload_key(&file.file_name), file, file.bytes.clone())
            .await
    }

    async fn create_thumbnail(&self, file: &UploadedFile) -> StorageResult<String> {
        let jpeg = render_thumbnail_blocking(file.bytes.clone()).await?;
        let thumbnail = UploadedFile {
            file_name: file.file_name.clone(),
            content_type: mime::IMAGE_JPEG.to_string(),
            bytes: jpeg.clone(),
        };
        self.put(thumbnail_key(&file.file_name), &thumbnail, jpeg)
            .await
    }

    async fn delete_file(&self, url: &str) -> StorageResult<()> {
        let key = key_from_url(&self.bucket, self.endpoint.as_deref(), url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(format!("{}: {}", key, e)))?;

        debug!(bucket = %self.bucket, key = %key, "Deleted object");
        Ok(())
    }
}

use std::path::PathBuf;

use core_config::{env_optional, env_or_default, env_required, ConfigError, FromEnv};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub region: String,
    /// S3-compatible endpoint (MinIO, R2, LocalStack)
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorageConfig {
    pub root: PathBuf,
    pub base_url: String,
}

/// Backend selection, read from `STORAGE_BACKEND`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    S3(S3StorageConfig),
    Local(LocalStorageConfig),
}

impl FromEnv for S3StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: env_required("AWS_S3_BUCKET_NAME")?,
            region: env_or_default("AWS_REGION", "eu-central-1"),
            endpoint_url: env_optional("AWS_ENDPOINT_URL"),
        })
    }
}

impl FromEnv for LocalStorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            root: PathBuf::from(env_or_default("LOCAL_STORAGE_DIR", "./uploads")),
            base_url: env_or_default("LOCAL_STORAGE_BASE_URL", "http://localhost:8080/uploads"),
        })
    }
}

impl FromEnv for StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_or_default("STORAGE_BACKEND", "s3");
        match backend.to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageConfig::S3(S3StorageConfig::from_env()?)),
            "local" => Ok(StorageConfig::Local(LocalStorageConfig::from_env()?)),
            other => Err(ConfigError::ParseError {
                key: "STORAGE_BACKEND".to_string(),
                details: format!("expected 's3' or 'local', got '{}'", other),
            }),
        }
    }
}

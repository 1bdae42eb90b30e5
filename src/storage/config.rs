//! Storage configuration.

use std::path::PathBuf;
use std::sync::Arc;

use super::{BlobBackend, LocalStorage, MemoryStorage, S3Config, S3Storage};

/// Storage backend type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// Local filesystem storage
    Local { path: PathBuf },
    /// S3-compatible storage (AWS S3, MinIO, R2, etc.)
    S3(S3Config),
    /// Process-local map, lost on restart
    Memory,
}

/// Storage configuration.
///
/// `storage_type == None` means the blob backend is not configured: reads
/// serve defaults and writes are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub storage_type: Option<StorageType>,
}

impl StorageConfig {
    /// No backend at all
    pub fn unconfigured() -> Self {
        Self { storage_type: None }
    }

    /// Create config for local storage at the given path
    pub fn local(path: PathBuf) -> Self {
        Self {
            storage_type: Some(StorageType::Local { path }),
        }
    }

    /// Read the storage settings from `CMS_STORAGE` and friends through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let kind = match var("CMS_STORAGE") {
            Some(kind) => kind,
            None => return Ok(Self::unconfigured()),
        };

        match kind.trim().to_ascii_lowercase().as_str() {
            "local" => {
                let path = var("CMS_STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| std::env::temp_dir().join("fluentia-cms"));
                Ok(Self::local(path))
            }
            "s3" => {
                let bucket = var("CMS_S3_BUCKET")
                    .ok_or_else(|| "CMS_S3_BUCKET is required when CMS_STORAGE=s3".to_string())?;
                let mut config = match var("CMS_S3_ENDPOINT") {
                    Some(endpoint) => {
                        let mut config = S3Config::minio(bucket, endpoint);
                        if let Some(region) = var("CMS_S3_REGION") {
                            config.region = region;
                        }
                        config
                    }
                    None => S3Config::aws(
                        bucket,
                        var("CMS_S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                    ),
                };
                if let Some(prefix) = var("CMS_S3_PREFIX") {
                    config = config.with_prefix(prefix);
                }
                Ok(Self {
                    storage_type: Some(StorageType::S3(config)),
                })
            }
            "memory" => Ok(Self {
                storage_type: Some(StorageType::Memory),
            }),
            other => Err(format!("unknown CMS_STORAGE backend: {}", other)),
        }
    }

    /// Build a storage backend from this config
    pub async fn build(&self) -> Option<Arc<dyn BlobBackend>> {
        match self.storage_type.as_ref()? {
            StorageType::Local { path } => {
                if let Err(e) = std::fs::create_dir_all(path) {
                    tracing::warn!("Could not create storage directory {:?}: {}", path, e);
                }
                Some(Arc::new(LocalStorage::new(path.clone())))
            }
            StorageType::S3(config) => Some(Arc::new(S3Storage::new(config.clone()).await)),
            StorageType::Memory => Some(Arc::new(MemoryStorage::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_absent_variable_means_unconfigured() {
        let config = StorageConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StorageConfig::unconfigured());

        let blank = StorageConfig::from_lookup(lookup(&[("CMS_STORAGE", "  ")])).unwrap();
        assert!(blank.storage_type.is_none());
    }

    #[test]
    fn test_local_and_memory() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("CMS_STORAGE", "local"),
            ("CMS_STORAGE_PATH", "/srv/cms"),
        ]))
        .unwrap();
        assert_eq!(config, StorageConfig::local(PathBuf::from("/srv/cms")));

        let config = StorageConfig::from_lookup(lookup(&[("CMS_STORAGE", "Memory")])).unwrap();
        assert_eq!(config.storage_type, Some(StorageType::Memory));
    }

    #[test]
    fn test_s3_settings() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("CMS_STORAGE", "s3"),
            ("CMS_S3_BUCKET", "site"),
            ("CMS_S3_ENDPOINT", "http://minio:9000"),
            ("CMS_S3_PREFIX", "prod/"),
        ]))
        .unwrap();
        match config.storage_type {
            Some(StorageType::S3(s3)) => {
                assert_eq!(s3.bucket, "site");
                assert!(s3.force_path_style);
                assert_eq!(s3.prefix.as_deref(), Some("prod/"));
            }
            other => panic!("expected S3 config, got {:?}", other),
        }

        let missing_bucket = StorageConfig::from_lookup(lookup(&[("CMS_STORAGE", "s3")]));
        assert!(missing_bucket.is_err());
        assert!(StorageConfig::from_lookup(lookup(&[("CMS_STORAGE", "ftp")])).is_err());
    }

    #[tokio::test]
    async fn test_build() {
        assert!(StorageConfig::unconfigured().build().await.is_none());
        let temp_dir = tempfile::TempDir::new().unwrap();
        let backend = StorageConfig::local(temp_dir.path().join("blobs")).build().await;
        assert!(backend.is_some());
        assert!(temp_dir.path().join("blobs").exists());
    }
}

//! Local filesystem storage backend.

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::backend::{Blob, BlobBackend, BlobInfo, Precondition, StorageError, StorageResult};

/// Local filesystem storage backend.
///
/// Stores objects in a directory structure:
/// ```text
/// {base_path}/
///   {namespace}/
///     {key}
/// ```
/// Revisions are the SHA-256 of the object body.
pub struct LocalStorage {
    base_path: PathBuf,
    /// Serializes conditional writes within this process
    write_lock: Mutex<()>,
}

impl LocalStorage {
    /// Create a new local storage backend
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the full path for a key
    fn key_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.base_path.join(namespace).join(key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write via a temp file and rename so readers never see a torn body
    async fn write_atomic(&self, path: &Path, data: &Bytes) -> StorageResult<()> {
        self.ensure_parent(path).await?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn current_revision(&self, path: &Path) -> StorageResult<Option<String>> {
        match fs::read(path).await {
            Ok(data) => Ok(Some(revision_of(&data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

fn revision_of(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn not_found(namespace: &str, key: &str, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(format!("{}/{}", namespace, key))
    } else {
        StorageError::Io(e)
    }
}

#[async_trait]
impl BlobBackend for LocalStorage {
    async fn head(&self, namespace: &str, key: &str) -> StorageResult<BlobInfo> {
        let path = self.key_path(namespace, key);
        let data = fs::read(&path)
            .await
            .map_err(|e| not_found(namespace, key, e))?;
        Ok(BlobInfo {
            size: data.len() as u64,
            revision: revision_of(&data),
        })
    }

    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Blob> {
        let path = self.key_path(namespace, key);
        let data = fs::read(&path)
            .await
            .map_err(|e| not_found(namespace, key, e))?;
        let revision = revision_of(&data);
        Ok(Blob {
            data: Bytes::from(data),
            revision,
        })
    }

    async fn put(
        &self,
        namespace: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_path(namespace, key);
        let _guard = self.write_lock.lock().await;
        self.write_atomic(&path, &data).await?;
        Ok(revision_of(&data))
    }

    async fn put_if(
        &self,
        namespace: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
        precondition: Precondition,
    ) -> StorageResult<String> {
        let path = self.key_path(namespace, key);
        let _guard = self.write_lock.lock().await;

        let current = self.current_revision(&path).await?;
        let holds = match (&precondition, &current) {
            (Precondition::Absent, None) => true,
            (Precondition::Matches(expected), Some(actual)) => expected == actual,
            _ => false,
        };
        if !holds {
            return Err(StorageError::Conflict(format!("{}/{}", namespace, key)));
        }

        self.write_atomic(&path, &data).await?;
        Ok(revision_of(&data))
    }
}

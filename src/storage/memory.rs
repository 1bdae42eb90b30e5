//! In-memory storage backend.
//!
//! Used by tests and by `CMS_STORAGE=memory` for throwaway local runs. Objects
//! live in a map behind a lock; revisions are a per-object generation counter.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::backend::{Blob, BlobBackend, BlobInfo, Precondition, StorageError, StorageResult};

struct StoredBlob {
    data: Bytes,
    generation: u64,
}

/// HashMap-based blob store.
#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredBlob>>,
    generation: AtomicU64,
    writes: AtomicU64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn full_key(namespace: &str, key: &str) -> String {
        format!("{}/{}", namespace, key)
    }

    fn store(&self, map: &mut HashMap<String, StoredBlob>, full_key: String, data: Bytes) -> String {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        map.insert(full_key, StoredBlob { data, generation });
        self.writes.fetch_add(1, Ordering::SeqCst);
        generation.to_string()
    }
}

#[async_trait]
impl BlobBackend for MemoryStorage {
    async fn head(&self, namespace: &str, key: &str) -> StorageResult<BlobInfo> {
        let full_key = Self::full_key(namespace, key);
        let map = self.objects.read();
        let blob = map
            .get(&full_key)
            .ok_or(StorageError::NotFound(full_key.clone()))?;
        Ok(BlobInfo {
            size: blob.data.len() as u64,
            revision: blob.generation.to_string(),
        })
    }

    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Blob> {
        let full_key = Self::full_key(namespace, key);
        let map = self.objects.read();
        let blob = map
            .get(&full_key)
            .ok_or(StorageError::NotFound(full_key.clone()))?;
        Ok(Blob {
            data: blob.data.clone(),
            revision: blob.generation.to_string(),
        })
    }

    async fn put(
        &self,
        namespace: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let mut map = self.objects.write();
        Ok(self.store(&mut map, Self::full_key(namespace, key), data))
    }

    async fn put_if(
        &self,
        namespace: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
        precondition: Precondition,
    ) -> StorageResult<String> {
        let full_key = Self::full_key(namespace, key);
        let mut map = self.objects.write();

        let current = map.get(&full_key).map(|b| b.generation.to_string());
        let holds = match (&precondition, &current) {
            (Precondition::Absent, None) => true,
            (Precondition::Matches(expected), Some(actual)) => expected == actual,
            _ => false,
        };
        if !holds {
            return Err(StorageError::Conflict(full_key));
        }

        Ok(self.store(&mut map, full_key, data))
    }
}

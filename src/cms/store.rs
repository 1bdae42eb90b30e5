//! Blob accessor and writer.
//!
//! Every CMS entity lives in one JSON blob under the `cms` namespace. Reads
//! never fail outright: a missing blob is seeded with its default, and any
//! other failure is reported through [`Fetched::Failed`] together with the
//! default so public pages keep rendering. Admin mutations go through
//! [`ContentStore::update`], which writes conditionally on the revision it
//! read and retries on conflict.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::storage::{namespaces, BlobBackend, Precondition, StorageError};

const JSON_CONTENT_TYPE: &str = "application/json";

/// How many times a conditional update re-reads after losing a race
pub const MAX_UPDATE_ATTEMPTS: usize = 5;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Gave up writing {path} after {attempts} conflicting attempts")]
    Conflict { path: String, attempts: usize },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a permissive read.
///
/// Every variant carries a usable value; only `Found` holds stored data.
#[derive(Debug)]
pub enum Fetched<T> {
    /// Decoded from the stored blob
    Found(T),
    /// Blob absent (now seeded) or empty; holds the default
    Missing(T),
    /// No backend configured; holds the default
    Unconfigured(T),
    /// Read or decode failed; holds the default and the cause
    Failed(T, StoreError),
}

impl<T> Fetched<T> {
    /// The value to render, whatever happened
    pub fn into_value(self) -> T {
        match self {
            Fetched::Found(v) | Fetched::Missing(v) | Fetched::Unconfigured(v) => v,
            Fetched::Failed(v, _) => v,
        }
    }

    /// Fail on read errors, accept defaults otherwise
    pub fn into_result(self) -> StoreResult<T> {
        match self {
            Fetched::Failed(_, e) => Err(e),
            other => Ok(other.into_value()),
        }
    }
}

/// What an update closure decided to do with the value it was handed
#[derive(Debug, PartialEq, Eq)]
pub enum Edit<R> {
    /// Persist the modified value and return `R`
    Save(R),
    /// Leave the blob untouched and return `R`
    Discard(R),
}

impl<R> Edit<R> {
    pub fn into_inner(self) -> R {
        match self {
            Edit::Save(r) | Edit::Discard(r) => r,
        }
    }
}

/// A blob read together with the precondition to write it back under
enum Snapshot<T> {
    Present { value: T, revision: String },
    Empty { revision: String },
    Absent,
}

/// Logical path of a CMS key, e.g. `cms/posts.json`
pub fn blob_path(key: &str) -> String {
    format!("{}/{}", namespaces::CMS, key)
}

/// JSON content store over an optional blob backend.
#[derive(Clone)]
pub struct ContentStore {
    backend: Option<Arc<dyn BlobBackend>>,
}

impl ContentStore {
    pub fn new(backend: Option<Arc<dyn BlobBackend>>) -> Self {
        Self { backend }
    }

    /// A store with no backend: reads serve defaults, writes are skipped
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Arc<dyn BlobBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Read `key`, seeding it with `default` the first time it is found absent.
    pub async fn fetch<T>(&self, key: &str, default: T) -> Fetched<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = blob_path(key);
        let Some(backend) = &self.backend else {
            tracing::warn!("Blob storage not configured. Serving default data for {}", path);
            return Fetched::Unconfigured(default);
        };

        match read_snapshot::<T>(backend.as_ref(), key).await {
            Ok(Snapshot::Present { value, .. }) => Fetched::Found(value),
            Ok(Snapshot::Empty { .. }) => {
                tracing::debug!("Blob at {} is empty, serving default data", path);
                Fetched::Missing(default)
            }
            Ok(Snapshot::Absent) => {
                tracing::info!("Blob not found at {}. Initializing with default data.", path);
                match self.seed(backend.as_ref(), key, &default).await {
                    Ok(()) => {}
                    // Somebody else seeded it first
                    Err(StoreError::Storage(StorageError::Conflict(_))) => {}
                    Err(e) => tracing::error!("Failed to seed {}: {}", path, e),
                }
                Fetched::Missing(default)
            }
            Err(e) => {
                tracing::error!("Failed to load blob from {}: {}", path, e);
                Fetched::Failed(default, e)
            }
        }
    }

    /// Overwrite `key` with `value`. Last writer wins.
    pub async fn write<T>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        T: Serialize,
    {
        let path = blob_path(key);
        let Some(backend) = &self.backend else {
            tracing::warn!("Blob storage not configured. Skipping save operation for {}", path);
            return Ok(());
        };

        let body = encode(key, value)?;
        backend
            .put(namespaces::CMS, key, body, JSON_CONTENT_TYPE)
            .await?;
        tracing::debug!("Saved {}", path);
        Ok(())
    }

    /// Read-modify-write `key` without losing concurrent updates.
    ///
    /// `edit` may run more than once: after a conflicting write it is handed a
    /// fresh copy of the stored value. Read failures are returned instead of
    /// being masked with the default.
    pub async fn update<T, R, F>(&self, key: &str, default: T, mut edit: F) -> StoreResult<R>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnMut(&mut T) -> Edit<R>,
    {
        let path = blob_path(key);
        let Some(backend) = &self.backend else {
            tracing::warn!("Blob storage not configured. Skipping save operation for {}", path);
            let mut value = default;
            return Ok(edit(&mut value).into_inner());
        };

        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let (mut value, precondition) = match read_snapshot::<T>(backend.as_ref(), key).await? {
                Snapshot::Present { value, revision } => (value, Precondition::Matches(revision)),
                Snapshot::Empty { revision } => (default.clone(), Precondition::Matches(revision)),
                Snapshot::Absent => (default.clone(), Precondition::Absent),
            };

            let result = match edit(&mut value) {
                Edit::Discard(r) => return Ok(r),
                Edit::Save(r) => r,
            };

            let body = encode(key, &value)?;
            match backend
                .put_if(namespaces::CMS, key, body, JSON_CONTENT_TYPE, precondition)
                .await
            {
                Ok(_) => {
                    tracing::debug!("Saved {} (attempt {})", path, attempt);
                    return Ok(result);
                }
                Err(StorageError::Conflict(_)) => {
                    tracing::warn!(
                        "Concurrent write to {} (attempt {}/{}), retrying",
                        path,
                        attempt,
                        MAX_UPDATE_ATTEMPTS
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Conflict {
            path,
            attempts: MAX_UPDATE_ATTEMPTS,
        })
    }

    async fn seed<T: Serialize>(
        &self,
        backend: &dyn BlobBackend,
        key: &str,
        default: &T,
    ) -> StoreResult<()> {
        let body = encode(key, default)?;
        backend
            .put_if(namespaces::CMS, key, body, JSON_CONTENT_TYPE, Precondition::Absent)
            .await?;
        Ok(())
    }
}

async fn read_snapshot<T: DeserializeOwned>(
    backend: &dyn BlobBackend,
    key: &str,
) -> StoreResult<Snapshot<T>> {
    match backend.head(namespaces::CMS, key).await {
        Ok(_) => {}
        Err(StorageError::NotFound(_)) => return Ok(Snapshot::Absent),
        Err(e) => return Err(e.into()),
    }

    let blob = match backend.get(namespaces::CMS, key).await {
        Ok(blob) => blob,
        // Deleted between resolving and reading
        Err(StorageError::NotFound(_)) => return Ok(Snapshot::Absent),
        Err(e) => return Err(e.into()),
    };

    if blob.data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Snapshot::Empty {
            revision: blob.revision,
        });
    }

    let value = serde_json::from_slice(&blob.data).map_err(|source| StoreError::Decode {
        path: blob_path(key),
        source,
    })?;
    Ok(Snapshot::Present {
        value,
        revision: blob.revision,
    })
}

fn encode<T: Serialize>(key: &str, value: &T) -> StoreResult<Bytes> {
    serde_json::to_vec_pretty(value)
        .map(Bytes::from)
        .map_err(|source| StoreError::Encode {
            path: blob_path(key),
            source,
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::{Blob, BlobInfo, MemoryStorage, StorageResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend whose reads always fail with a transport error
    pub(crate) struct BrokenBackend;

    #[async_trait]
    impl BlobBackend for BrokenBackend {
        async fn head(&self, _: &str, _: &str) -> StorageResult<BlobInfo> {
            Err(StorageError::Other("connection reset".into()))
        }
        async fn get(&self, _: &str, _: &str) -> StorageResult<Blob> {
            Err(StorageError::Other("connection reset".into()))
        }
        async fn put(&self, _: &str, _: &str, _: Bytes, _: &str) -> StorageResult<String> {
            Err(StorageError::Other("connection reset".into()))
        }
        async fn put_if(&self, _: &str, _: &str, _: Bytes, _: &str, _: Precondition) -> StorageResult<String> {
            Err(StorageError::Other("connection reset".into()))
        }
    }

    fn memory_store() -> (ContentStore, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::new());
        (ContentStore::with_backend(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_unconfigured_serves_default_and_skips_writes() {
        let store = ContentStore::unconfigured();
        let fetched = store.fetch("numbers.json", vec![1, 2]).await;
        assert!(matches!(fetched, Fetched::Unconfigured(ref v) if v == &vec![1, 2]));

        store.write("numbers.json", &vec![9]).await.unwrap();
        assert_eq!(store.fetch("numbers.json", vec![1, 2]).await.into_value(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_first_read_seeds_default_once() {
        let (store, backend) = memory_store();

        let first = store.fetch("numbers.json", vec![1, 2, 3]).await;
        assert!(matches!(first, Fetched::Missing(_)));
        assert_eq!(backend.write_count(), 1);

        let second = store.fetch("numbers.json", vec![1, 2, 3]).await;
        assert!(matches!(second, Fetched::Found(ref v) if v == &vec![1, 2, 3]));
        assert_eq!(backend.write_count(), 1);

        // Seeded body is pretty-printed JSON
        let blob = backend.get("cms", "numbers.json").await.unwrap();
        assert_eq!(std::str::from_utf8(&blob.data).unwrap(), "[\n  1,\n  2,\n  3\n]");
    }

    #[tokio::test]
    async fn test_empty_body_is_missing_without_reseed() {
        let (store, backend) = memory_store();
        backend.put("cms", "numbers.json", Bytes::from(""), JSON_CONTENT_TYPE).await.unwrap();

        let fetched = store.fetch("numbers.json", vec![7]).await;
        assert!(matches!(fetched, Fetched::Missing(ref v) if v == &vec![7]));
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_masked_with_default() {
        let store = ContentStore::with_backend(Arc::new(BrokenBackend));
        let fetched = store.fetch("numbers.json", vec![4]).await;
        assert!(matches!(fetched, Fetched::Failed(ref v, StoreError::Storage(_)) if v == &vec![4]));
        assert!(store.fetch("numbers.json", vec![4]).await.into_result().is_err());
    }

    #[tokio::test]
    async fn test_corrupt_blob_reports_decode_error() {
        let (store, backend) = memory_store();
        backend.put("cms", "numbers.json", Bytes::from("{not json"), JSON_CONTENT_TYPE).await.unwrap();

        let fetched = store.fetch("numbers.json", vec![5]).await;
        assert!(matches!(fetched, Fetched::Failed(ref v, StoreError::Decode { .. }) if v == &vec![5]));
    }

    #[tokio::test]
    async fn test_update_discard_does_not_write() {
        let (store, backend) = memory_store();
        store.write("numbers.json", &vec![1]).await.unwrap();

        let result = store
            .update("numbers.json", Vec::<i32>::new(), |list| {
                list.push(2);
                Edit::Discard("rejected")
            })
            .await
            .unwrap();
        assert_eq!(result, "rejected");
        assert_eq!(backend.write_count(), 1);
        assert_eq!(store.fetch("numbers.json", Vec::<i32>::new()).await.into_value(), vec![1]);
    }

    #[tokio::test]
    async fn test_update_creates_absent_blob() {
        let (store, _backend) = memory_store();
        store
            .update("numbers.json", vec![1], |list| {
                list.push(2);
                Edit::Save(())
            })
            .await
            .unwrap();
        assert_eq!(store.fetch("numbers.json", Vec::<i32>::new()).await.into_value(), vec![1, 2]);
    }

    /// Memory backend where another writer lands just before our first conditional write
    struct RacingBackend {
        inner: MemoryStorage,
        raced: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl BlobBackend for RacingBackend {
        async fn head(&self, ns: &str, key: &str) -> StorageResult<BlobInfo> {
            self.inner.head(ns, key).await
        }
        async fn get(&self, ns: &str, key: &str) -> StorageResult<Blob> {
            self.inner.get(ns, key).await
        }
        async fn put(&self, ns: &str, key: &str, data: Bytes, ct: &str) -> StorageResult<String> {
            self.inner.put(ns, key, data, ct).await
        }
        async fn put_if(
            &self,
            ns: &str,
            key: &str,
            data: Bytes,
            ct: &str,
            precondition: Precondition,
        ) -> StorageResult<String> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                self.inner.put(ns, key, Bytes::from("[1, 100]"), ct).await?;
            }
            self.inner.put_if(ns, key, data, ct, precondition).await
        }
    }

    #[tokio::test]
    async fn test_update_retries_after_conflict() {
        let backend = Arc::new(RacingBackend {
            inner: MemoryStorage::new(),
            raced: std::sync::atomic::AtomicBool::new(false),
        });
        let store = ContentStore::with_backend(backend.clone());
        store.write("numbers.json", &vec![1]).await.unwrap();

        let calls = AtomicUsize::new(0);
        let result = store
            .update("numbers.json", Vec::<i32>::new(), |list| {
                calls.fetch_add(1, Ordering::SeqCst);
                list.push(2);
                Edit::Save(list.len())
            })
            .await
            .unwrap();

        // First attempt lost the race and was replayed on the competing value
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result, 3);
        assert_eq!(
            store.fetch("numbers.json", Vec::<i32>::new()).await.into_value(),
            vec![1, 100, 2]
        );
    }

    #[tokio::test]
    async fn test_update_surfaces_read_errors() {
        let store = ContentStore::with_backend(Arc::new(BrokenBackend));
        let result = store
            .update("numbers.json", vec![1], |_| Edit::Save(()))
            .await;
        assert!(matches!(result, Err(StoreError::Storage(StorageError::Other(_)))));
    }
}

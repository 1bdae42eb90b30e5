//! Blob backend trait definition.
//!
//! Provides an abstraction over the object stores that hold the CMS blobs
//! (local filesystem, S3, in-memory) with revision tokens so callers can do
//! conditional writes.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

/// Storage error types
#[derive(Debug)]
pub enum StorageError {
    /// Object not found
    NotFound(String),
    /// Conditional write rejected because the stored revision moved on
    Conflict(String),
    /// IO error
    Io(std::io::Error),
    /// Other error
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(key) => write!(f, "Object not found: {}", key),
            StorageError::Conflict(key) => write!(f, "Revision conflict on {}", key),
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata returned when resolving an object without reading it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobInfo {
    pub size: u64,
    /// Opaque token identifying the stored version (ETag or content hash)
    pub revision: String,
}

/// An object body together with the revision it was read at.
#[derive(Clone, Debug)]
pub struct Blob {
    pub data: Bytes,
    pub revision: String,
}

/// Precondition for a conditional write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Precondition {
    /// Only write if no object exists at the key
    Absent,
    /// Only write if the stored revision equals this token
    Matches(String),
}

/// Blob backend trait.
///
/// Keys are organized by namespace (e.g. "cms") so the persisted layout reads
/// `<namespace>/<key>`, matching paths like `cms/posts.json`.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Resolve an object's metadata. Returns `NotFound` if it does not exist.
    async fn head(&self, namespace: &str, key: &str) -> StorageResult<BlobInfo>;

    /// Get an object body by namespace and key
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Blob>;

    /// Overwrite an object unconditionally, returning the new revision
    async fn put(
        &self,
        namespace: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Write only if `precondition` holds, returning the new revision.
    /// A failed precondition yields `StorageError::Conflict`.
    async fn put_if(
        &self,
        namespace: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
        precondition: Precondition,
    ) -> StorageResult<String>;
}

/// Storage namespaces
pub mod namespaces {
    /// CMS content and record blobs
    pub const CMS: &str = "cms";
}

//! Storage backend abstraction.
//!
//! Provides a pluggable blob layer for the content store, backed by:
//! - Local filesystem
//! - S3-compatible object storage (AWS S3, MinIO, R2, etc.)
//! - An in-memory map
//!
//! Every backend hands out revision tokens so the content store can do
//! conditional read-modify-write cycles.

mod backend;
mod config;
mod local;
mod memory;
mod s3;

pub use backend::{namespaces, Blob, BlobBackend, BlobInfo, Precondition, StorageError, StorageResult};
pub use config::{StorageConfig, StorageType};
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use s3::{S3Config, S3Storage};

//! S3-compatible storage backend.
//!
//! Works with AWS S3, MinIO, R2 and similar. Revisions are object ETags and
//! conditional writes map onto `If-Match` / `If-None-Match: *`.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Builder, Region},
    error::DisplayErrorContext,
    operation::put_object::builders::PutObjectFluentBuilder,
    primitives::ByteStream,
    Client,
};
use bytes::Bytes;

use super::backend::{Blob, BlobBackend, BlobInfo, Precondition, StorageError, StorageResult};

/// S3 storage backend configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// Optional prefix for all keys (e.g., "site/")
    pub prefix: Option<String>,
    /// AWS region
    pub region: String,
    /// Custom endpoint URL (for MinIO, R2, etc.)
    pub endpoint: Option<String>,
    /// Force path-style URLs (required for MinIO)
    pub force_path_style: bool,
}

impl S3Config {
    /// Create config for AWS S3
    pub fn aws(bucket: String, region: String) -> Self {
        Self {
            bucket,
            prefix: None,
            region,
            endpoint: None,
            force_path_style: false,
        }
    }

    /// Create config for MinIO or other S3-compatible storage
    pub fn minio(bucket: String, endpoint: String) -> Self {
        Self {
            bucket,
            prefix: None,
            region: "us-east-1".to_string(), // MinIO doesn't care about region
            endpoint: Some(endpoint),
            force_path_style: true,
        }
    }

    /// Set a key prefix
    pub fn with_prefix(mut self, prefix: String) -> Self {
        self.prefix = Some(prefix);
        self
    }
}

/// S3-compatible storage backend
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

impl S3Storage {
    /// Connect using the ambient AWS credential chain
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        let mut builder = Builder::new()
            .region(Region::new(config.region))
            .force_path_style(config.force_path_style);
        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if let Some(creds) = sdk_config.credentials_provider() {
            builder = builder.credentials_provider(creds);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket,
            prefix: config.prefix,
        }
    }

    /// `<prefix><namespace>/<key>`
    fn object_key(&self, namespace: &str, key: &str) -> String {
        format!("{}{}/{}", self.prefix.as_deref().unwrap_or(""), namespace, key)
    }

    fn put_request(&self, namespace: &str, key: &str, data: Bytes, content_type: &str) -> PutObjectFluentBuilder {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.object_key(namespace, key))
            .content_type(content_type)
            .body(ByteStream::from(data))
    }
}

/// Map an SDK error onto our storage error by its rendered context
fn classify(err: String, namespace: &str, key: &str) -> StorageError {
    if err.contains("NoSuchKey") || err.contains("NotFound") || err.contains("404") {
        StorageError::NotFound(format!("{}/{}", namespace, key))
    } else if err.contains("PreconditionFailed")
        || err.contains("412")
        || err.contains("ConditionalRequestConflict")
        || err.contains("409")
    {
        StorageError::Conflict(format!("{}/{}", namespace, key))
    } else {
        StorageError::Other(err)
    }
}

fn sdk_error<E: std::error::Error>(err: E, namespace: &str, key: &str) -> StorageError {
    classify(DisplayErrorContext(&err).to_string(), namespace, key)
}

fn etag(tag: Option<&str>) -> String {
    tag.unwrap_or_default().trim_matches('"').to_string()
}

#[async_trait]
impl BlobBackend for S3Storage {
    async fn head(&self, namespace: &str, key: &str) -> StorageResult<BlobInfo> {
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.object_key(namespace, key))
            .send()
            .await
            .map_err(|e| sdk_error(e, namespace, key))?;

        Ok(BlobInfo {
            size: head.content_length().unwrap_or(0).max(0) as u64,
            revision: etag(head.e_tag()),
        })
    }

    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Blob> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.object_key(namespace, key))
            .send()
            .await
            .map_err(|e| sdk_error(e, namespace, key))?;

        let revision = etag(object.e_tag());
        let body = object
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(Blob {
            data: body.into_bytes(),
            revision,
        })
    }

    async fn put(&self, namespace: &str, key: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        let output = self
            .put_request(namespace, key, data, content_type)
            .send()
            .await
            .map_err(|e| sdk_error(e, namespace, key))?;
        Ok(etag(output.e_tag()))
    }

    async fn put_if(
        &self,
        namespace: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
        precondition: Precondition,
    ) -> StorageResult<String> {
        let request = self.put_request(namespace, key, data, content_type);
        let request = match precondition {
            Precondition::Absent => request.if_none_match("*"),
            Precondition::Matches(revision) => request.if_match(format!("\"{}\"", revision)),
        };

        let output = request
            .send()
            .await
            .map_err(|e| sdk_error(e, namespace, key))?;
        Ok(etag(output.e_tag()))
    }
}

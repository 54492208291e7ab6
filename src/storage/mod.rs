//! Storage module for object storage backends
//!
//! The rest of the service only talks to [`BlobStore`]. Two backends exist:
//! - [`S3Client`]: AWS S3 and S3-compatible services (MinIO, R2)
//! - [`MemoryBlobStore`]: process-local store for development and tests

mod memory;
mod s3_client;
mod types;

use async_trait::async_trait;

use crate::error::StorageError;

pub use memory::MemoryBlobStore;
pub use s3_client::S3Client;
pub use types::*;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Key/blob store with public-URL retrieval and prefix listing
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, returning the metadata recorded by the store.
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<ObjectMetadata>;

    /// Get object metadata without the body
    async fn head_object(&self, key: &str) -> StorageResult<ObjectMetadata>;

    /// List a single page of objects
    async fn list_objects(&self, options: ListOptions) -> StorageResult<ObjectList>;

    /// Public retrieval URL for a key
    fn public_url(&self, key: &str) -> String;

    /// Check if an object exists
    async fn object_exists(&self, key: &str) -> StorageResult<bool> {
        match self.head_object(key).await {
            Ok(_) => Ok(true),
            Err(StorageError::ObjectNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

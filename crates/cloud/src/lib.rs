//! Blob storage providers.
//!
//! The pipeline treats storage as an opaque interface: upload bytes at a
//! path, get a stable URL back, optionally delete (orphan cleanup when a
//! later pipeline step fails). Two providers: S3 for production, local
//! filesystem for development and tests.

pub mod local;
pub mod s3;

use async_trait::async_trait;

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

/// Errors from a storage provider.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("blob upload failed: {0}")]
    Upload(String),

    #[error("blob delete failed: {0}")]
    Delete(String),

    #[error("invalid blob path: {0}")]
    InvalidPath(String),
}

/// An opaque blob store.
///
/// `upload` returns the stable public URL of the stored object. `delete`
/// is used for best-effort cleanup of orphaned blobs and must be
/// idempotent (deleting a missing object is not an error).
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, CloudError>;

    async fn delete(&self, path: &str) -> Result<(), CloudError>;
}

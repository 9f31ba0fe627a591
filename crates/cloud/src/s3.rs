//! S3-backed blob store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::{BlobStore, CloudError};

/// Blob store backed by an S3 bucket.
///
/// Objects are served through `public_base_url` (a CDN or the bucket's
/// public endpoint); the returned URL is `{public_base_url}/{path}`.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from the ambient AWS environment.
    ///
    /// | Env Var                | Required |
    /// |------------------------|----------|
    /// | `S3_BUCKET`            | **yes**  |
    /// | `S3_PUBLIC_BASE_URL`   | **yes**  |
    ///
    /// Credentials and region come from the standard AWS environment /
    /// profile chain.
    pub async fn from_env() -> Self {
        let bucket = std::env::var("S3_BUCKET").expect("S3_BUCKET must be set");
        let public_base_url =
            std::env::var("S3_PUBLIC_BASE_URL").expect("S3_PUBLIC_BASE_URL must be set");
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config), bucket, public_base_url)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, CloudError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| CloudError::Upload(e.to_string()))?;

        tracing::debug!(bucket = %self.bucket, path, "uploaded blob");
        Ok(format!("{}/{}", self.public_base_url, path))
    }

    async fn delete(&self, path: &str) -> Result<(), CloudError> {
        // DeleteObject on a missing key succeeds, which gives us the
        // idempotency the trait requires.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| CloudError::Delete(e.to_string()))?;
        Ok(())
    }
}

//! Local-filesystem blob store for development and tests.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::{BlobStore, CloudError};

/// Stores blobs under a root directory and serves them from a configured
/// base URL (typically a static-file route in dev).
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a blob path under the root, rejecting traversal segments.
    fn resolve(&self, path: &str) -> Result<PathBuf, CloudError> {
        let rel = Path::new(path);
        let traversal = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || traversal {
            return Err(CloudError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, CloudError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CloudError::Upload(e.to_string()))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| CloudError::Upload(e.to_string()))?;

        Ok(format!("{}/{}", self.base_url, path))
    }

    async fn delete(&self, path: &str) -> Result<(), CloudError> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            // Idempotent: a missing blob is already "deleted".
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CloudError::Delete(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3000/blobs/");

        let url = store
            .upload("documents/t1/c1/123.pdf", b"%PDF-1.7".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/blobs/documents/t1/c1/123.pdf");
        let written = std::fs::read(dir.path().join("documents/t1/c1/123.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn delete_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost");

        store
            .upload("a/b.pdf", b"x".to_vec(), "application/pdf")
            .await
            .unwrap();
        store.delete("a/b.pdf").await.unwrap();
        assert!(!dir.path().join("a/b.pdf").exists());

        // Second delete of the same path is not an error.
        store.delete("a/b.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost");

        let err = store
            .upload("../escape.pdf", b"x".to_vec(), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::InvalidPath(_)));
    }
}

//! Local filesystem [`BlobStore`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use driverflow_core::error::CoreError;
use driverflow_core::ports::BlobStore;
use driverflow_core::uploads::sanitize_component;
use uuid::Uuid;

/// Writes uploads into a single directory.
///
/// References are the stored file names, relative to the root. Each name
/// carries a time-ordered UUID prefix so re-uploads never overwrite.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a stored reference, or `None` when the reference could not
    /// have been produced by [`BlobStore::store`].
    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        if reference.is_empty()
            || reference == "."
            || reference == ".."
            || sanitize_component(reference) != reference
        {
            return None;
        }
        Some(self.root.join(reference))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String, CoreError> {
        let name = format!(
            "{}_{}",
            Uuid::now_v7().simple(),
            sanitize_component(suggested_name)
        );

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CoreError::Persistence(format!("Failed to create upload dir: {e}")))?;
        tokio::fs::write(self.root.join(&name), &bytes)
            .await
            .map_err(|e| CoreError::Persistence(format!("Failed to write upload: {e}")))?;

        tracing::debug!(file = %name, bytes = bytes.len(), "Upload stored");
        Ok(name)
    }

    async fn exists(&self, reference: &str) -> Result<bool, CoreError> {
        let Some(path) = self.resolve(reference) else {
            return Ok(false);
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::Persistence(format!("Failed to stat upload: {e}"))),
        }
    }

    async fn remove(&self, reference: &str) -> Result<(), CoreError> {
        let Some(path) = self.resolve(reference) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(file = %reference, "Upload removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Persistence(format!("Failed to remove upload: {e}"))),
        }
    }
}

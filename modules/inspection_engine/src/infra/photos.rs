//! Filesystem photo store
//!
//! Photos land in the uploads directory as `<uuid>.jpg` and are referenced by
//! their public path, `/uploads/<uuid>.jpg`, which the server serves statically.

use crate::contract::PhotoRef;
use crate::domain::repository::PhotoStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const UPLOADS_PREFIX: &str = "/uploads";

pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Disk location of a reference produced by this store
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = reference.strip_prefix(UPLOADS_PREFIX)?.strip_prefix('/')?;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn upload(&self, jpeg: &[u8]) -> Result<PhotoRef> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating uploads dir {}", self.root.display()))?;

        let name = format!("{}.jpg", Uuid::new_v4());
        let path = self.root.join(&name);
        tokio::fs::write(&path, jpeg)
            .await
            .with_context(|| format!("writing photo {}", path.display()))?;

        tracing::debug!(path = %path.display(), bytes = jpeg.len(), "Photo stored");
        Ok(format!("{}/{}", UPLOADS_PREFIX, name))
    }
}

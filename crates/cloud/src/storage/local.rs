//! Filesystem-backed image store for development and self-hosting.
//!
//! Files land in `{root}/{folder}/{uuid}.{ext}` and are served by the API
//! under `{public_base}/{folder}/{uuid}.{ext}`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{ImageStore, ImageStoreError, ImageUpload, StoredImage};

/// [`ImageStore`] that writes to a local directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base: String,
}

impl LocalImageStore {
    /// `public_base` is the URL path the directory is mounted at, e.g. `/uploads/images`.
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public URL back to a path under `root`, refusing traversal.
    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(&self.public_base)?.strip_prefix('/')?;
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<StoredImage, ImageStoreError> {
        let folder = image.folder.as_str();
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), image.extension);
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        let url = format!("{}/{folder}/{file_name}", self.public_base);
        tracing::info!(%url, size = image.bytes.len(), "Image stored on local disk");
        Ok(StoredImage { url })
    }

    async fn delete(&self, url: &str) -> Result<(), ImageStoreError> {
        let path = self
            .path_for_url(url)
            .ok_or_else(|| ImageStoreError::UnknownUrl(url.to_string()))?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Image removed from local disk");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Image already missing on local disk");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

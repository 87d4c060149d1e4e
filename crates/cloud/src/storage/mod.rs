//! Image storage for place pictures and profile avatars.

use async_trait::async_trait;
use placebook_core::image::ImageFolder;

pub mod cloudinary;
pub mod local;

pub use cloudinary::{CloudinaryConfig, CloudinaryStore};
pub use local::LocalImageStore;

/// Errors from an image storage backend.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage API returned a non-2xx status code.
    #[error("Image storage API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Local filesystem failure.
    #[error("Image storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The URL does not point at an image this backend manages.
    #[error("Not a managed image URL: {0}")]
    UnknownUrl(String),
}

/// An already-validated image ready to be stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub folder: ImageFolder,
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// File extension matching `content_type` (without the dot).
    pub extension: &'static str,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public URL persisted on the owning record.
    pub url: String,
}

/// Stores images and deletes them again by their public URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an image and return its public URL.
    async fn upload(&self, image: ImageUpload) -> Result<StoredImage, ImageStoreError>;

    /// Delete the image behind `url`. Deleting an already-missing image succeeds.
    async fn delete(&self, url: &str) -> Result<(), ImageStoreError>;
}

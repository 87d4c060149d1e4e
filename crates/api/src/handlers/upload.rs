//! Multipart form reading shared by signup and place creation.

use std::collections::HashMap;

use axum::extract::Multipart;
use placebook_cloud::{ImageStore, ImageUpload};
use placebook_core::image::{validate_image, ImageFolder};

use crate::error::AppResult;

/// Name of the file field in both upload forms.
const IMAGE_FIELD: &str = "image";

/// A file part as received, before validation.
#[derive(Debug)]
pub struct ReceivedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Text fields plus the optional `image` part of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    image: Option<ReceivedImage>,
}

impl UploadForm {
    /// Drain a multipart body. Later duplicates of a field replace earlier ones.
    pub async fn read(multipart: &mut Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            if name == IMAGE_FIELD {
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field.bytes().await?;
                form.image = Some(ReceivedImage {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else if !name.is_empty() {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Trimmed value of a text field; empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Raw value of a text field, for inputs that must not be trimmed.
    pub fn raw(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn take_image(&mut self) -> Option<ReceivedImage> {
        self.image.take()
    }
}

/// Check a received image against the upload rules and tag it for `folder`.
pub fn prepare_upload(
    image: ReceivedImage,
    folder: ImageFolder,
    max_bytes: usize,
) -> AppResult<ImageUpload> {
    let extension = validate_image(&image.content_type, image.bytes.len(), max_bytes)?;
    Ok(ImageUpload {
        folder,
        bytes: image.bytes,
        content_type: image.content_type,
        extension,
    })
}

/// Delete an image whose owning record was never written.
///
/// Failures are logged and swallowed; the caller is already returning the
/// error that made the image an orphan.
pub async fn discard_orphaned_image(images: &dyn ImageStore, url: &str) {
    if let Err(e) = images.delete(url).await {
        tracing::warn!(error = %e, %url, "Failed to remove orphaned image");
    }
}

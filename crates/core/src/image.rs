//! Upload rules for place and profile images.

use crate::error::CoreError;

/// Default upper bound on an uploaded image (50 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

/// Accepted MIME types and the file extension stored for each.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
];

const UNSUPPORTED_FORMAT: &str = "Only .png, .jpg, and .jpeg formats are allowed!";

/// Logical destination of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    /// Images attached to places.
    Places,
    /// User profile pictures.
    Profiles,
}

impl ImageFolder {
    /// Folder name used by storage backends.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFolder::Places => "places",
            ImageFolder::Profiles => "profile_pictures",
        }
    }
}

/// Return the stored file extension for an accepted MIME type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let normalized = content_type.trim().to_ascii_lowercase();
    MIME_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == normalized)
        .map(|(_, ext)| *ext)
}

/// Validate an uploaded image's MIME type and size.
///
/// Returns the extension to store the file under.
pub fn validate_image(
    content_type: &str,
    size: usize,
    max_bytes: usize,
) -> Result<&'static str, CoreError> {
    let ext = extension_for(content_type).ok_or_else(|| CoreError::invalid(UNSUPPORTED_FORMAT))?;
    if size == 0 {
        return Err(CoreError::invalid("Uploaded image is empty"));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "Image must not exceed {max_bytes} bytes"
        )));
    }
    Ok(ext)
}

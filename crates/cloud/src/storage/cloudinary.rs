//! Cloudinary upload API client.
//!
//! Uses signed `image/upload` and `image/destroy` calls. Signatures are the
//! SHA-256 hex digest of the alphabetically sorted parameters followed by the
//! API secret, so the Cloudinary account must be set to SHA-256 signing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageStore, ImageStoreError, ImageUpload, StoredImage};

/// Default Cloudinary API root.
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";
/// Default top-level folder every upload is placed under.
const DEFAULT_FOLDER_PREFIX: &str = "Placebook";
/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoint settings for Cloudinary.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder_prefix: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl CloudinaryConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default                            |
    /// |-----------------------------|----------|------------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`     | **yes**  | --                                 |
    /// | `CLOUDINARY_API_KEY`        | **yes**  | --                                 |
    /// | `CLOUDINARY_API_SECRET`     | **yes**  | --                                 |
    /// | `CLOUDINARY_FOLDER_PREFIX`  | no       | `Placebook`                        |
    /// | `CLOUDINARY_API_BASE`       | no       | `https://api.cloudinary.com/v1_1`  |
    /// | `IMAGE_UPLOAD_TIMEOUT_SECS` | no       | `30`                               |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let required = |name: &str| {
            let value = std::env::var(name)
                .unwrap_or_else(|_| panic!("{name} must be set when IMAGE_STORAGE=cloudinary"));
            assert!(!value.is_empty(), "{name} must not be empty");
            value
        };

        let timeout_secs: u64 = std::env::var("IMAGE_UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("IMAGE_UPLOAD_TIMEOUT_SECS must be a valid u64");

        Self {
            cloud_name: required("CLOUDINARY_CLOUD_NAME"),
            api_key: required("CLOUDINARY_API_KEY"),
            api_secret: required("CLOUDINARY_API_SECRET"),
            folder_prefix: std::env::var("CLOUDINARY_FOLDER_PREFIX")
                .unwrap_or_else(|_| DEFAULT_FOLDER_PREFIX.into()),
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
        }
    }
}

/// Subset of the upload response we rely on.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Body of a destroy response: `"ok"` or `"not found"`.
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// [`ImageStore`] backed by Cloudinary.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    /// Build a client with the configured request timeout.
    pub fn new(config: CloudinaryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.config.api_base, self.config.cloud_name
        )
    }

    /// Ensure the response has a success status code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ImageStoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ImageStoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, image: ImageUpload) -> Result<StoredImage, ImageStoreError> {
        let folder = format!("{}/{}", self.config.folder_prefix, image.folder.as_str());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let file = Part::bytes(image.bytes)
            .file_name(format!("upload.{}", image.extension))
            .mime_str(&image.content_type)?;
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::ensure_success(response).await?.json().await?;

        tracing::info!(url = %uploaded.secure_url, "Image uploaded to Cloudinary");
        Ok(StoredImage {
            url: uploaded.secure_url,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), ImageStoreError> {
        let public_id =
            public_id_from_url(url).ok_or_else(|| ImageStoreError::UnknownUrl(url.to_string()))?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;
        let destroyed: DestroyResponse = Self::ensure_success(response).await?.json().await?;

        if destroyed.result == "ok" {
            tracing::info!(%public_id, "Image deleted from Cloudinary");
        } else {
            tracing::warn!(%public_id, result = %destroyed.result, "Cloudinary destroy did not remove an image");
        }
        Ok(())
    }
}

/// Build a Cloudinary request signature.
///
/// Parameters are sorted by name, joined as `k=v` pairs with `&`, suffixed
/// with the secret and hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(name, _)| *name);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Recover the public id of a delivery URL.
///
/// `https://res.cloudinary.com/demo/image/upload/v1712/Placebook/places/abc.jpg`
/// yields `Placebook/places/abc`. Returns `None` for URLs without an
/// `/upload/` segment.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/upload/")?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);

    let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if segments
        .first()
        .is_some_and(|s| s.len() > 1 && s.starts_with('v') && s[1..].chars().all(|c| c.is_ascii_digit()))
    {
        segments.remove(0);
    }

    let last = segments.pop()?;
    let stem = last.rsplit_once('.').map_or(last, |(stem, _)| stem);
    if stem.is_empty() {
        return None;
    }
    segments.push(stem);
    Some(segments.join("/"))
}

use std::path::PathBuf;

use placebook_cloud::geocoding::LocationIqConfig;
use placebook_cloud::storage::CloudinaryConfig;
use placebook_core::image::DEFAULT_MAX_IMAGE_BYTES;

use crate::auth::jwt::JwtConfig;

/// Where uploaded images are kept.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Files on local disk, served back by the API under `/uploads/images`.
    Local { upload_dir: PathBuf },
    /// Cloudinary upload API.
    Cloudinary(CloudinaryConfig),
}

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted image in bytes (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// JWT signing configuration.
    pub jwt: JwtConfig,
    /// Image storage backend.
    pub storage: StorageConfig,
    /// LocationIQ geocoder settings.
    pub geocoder: LocationIqConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `52428800`                 |
    /// | `IMAGE_STORAGE`        | `local` (or `cloudinary`)  |
    /// | `UPLOAD_DIR`           | `uploads/images`           |
    ///
    /// JWT, Cloudinary and LocationIQ settings are read by their own
    /// `from_env` constructors.
    ///
    /// # Panics
    ///
    /// Panics on unparsable values, an unknown `IMAGE_STORAGE`, or missing
    /// required secrets.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_IMAGE_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let storage = match std::env::var("IMAGE_STORAGE")
            .unwrap_or_else(|_| "local".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => StorageConfig::Local {
                upload_dir: std::env::var("UPLOAD_DIR")
                    .unwrap_or_else(|_| "uploads/images".into())
                    .into(),
            },
            "cloudinary" => StorageConfig::Cloudinary(CloudinaryConfig::from_env()),
            other => panic!("IMAGE_STORAGE must be 'local' or 'cloudinary', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            storage,
            geocoder: LocationIqConfig::from_env(),
        }
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use placebook_api::auth::jwt::JwtConfig;
use placebook_api::config::{ServerConfig, StorageConfig};
use placebook_api::router::build_app_router;
use placebook_api::state::AppState;
use placebook_cloud::geocoding::LocationIqConfig;
use placebook_cloud::{GeocodeError, Geocoder, ImageStore, ImageStoreError, ImageUpload, StoredImage};
use placebook_core::geo::Coordinates;
use sqlx::PgPool;
use tower::ServiceExt;

/// Address the fake geocoder has no result for.
pub const UNKNOWN_ADDRESS: &str = "Nowhere At All";
/// Address the fake geocoder fails on as if the provider were down.
pub const OUTAGE_ADDRESS: &str = "Provider Outage Lane";
/// Coordinates returned for every other address.
pub const DEFAULT_LOCATION: Coordinates = Coordinates {
    lat: 40.7484405,
    lng: -73.9856644,
};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory [`Geocoder`] with two reserved failure addresses.
#[derive(Default)]
pub struct FakeGeocoder;

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn coordinates_for(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        match address {
            UNKNOWN_ADDRESS => Err(GeocodeError::NoResults),
            OUTAGE_ADDRESS => Err(GeocodeError::Api {
                status: 503,
                body: "service unavailable".into(),
            }),
            _ => Ok(DEFAULT_LOCATION),
        }
    }
}

/// In-memory [`ImageStore`] recording what was uploaded and deleted.
#[derive(Default)]
pub struct FakeImageStore {
    stored: Mutex<HashMap<String, ImageUpload>>,
    uploads: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    fail_uploads: Mutex<bool>,
    fail_deletes: Mutex<bool>,
}

impl FakeImageStore {
    pub fn stored_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.stored.lock().unwrap().keys().cloned().collect();
        urls.sort();
        urls
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self) {
        *self.fail_uploads.lock().unwrap() = true;
    }

    pub fn fail_deletes(&self) {
        *self.fail_deletes.lock().unwrap() = true;
    }
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<StoredImage, ImageStoreError> {
        if *self.fail_uploads.lock().unwrap() {
            return Err(ImageStoreError::Api {
                status: 500,
                body: "upload refused".into(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        let url = format!(
            "https://images.test/{}/{n}.{}",
            image.folder.as_str(),
            image.extension
        );
        self.stored.lock().unwrap().insert(url.clone(), image);
        Ok(StoredImage { url })
    }

    async fn delete(&self, url: &str) -> Result<(), ImageStoreError> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(ImageStoreError::Api {
                status: 500,
                body: "destroy refused".into(),
            });
        }
        self.stored.lock().unwrap().remove(url);
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a small upload limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024,
        jwt: JwtConfig {
            secret: "test-jwt-secret-for-integration-tests".to_string(),
            expiry_mins: 60,
        },
        storage: StorageConfig::Local {
            upload_dir: PathBuf::from("target/test-uploads"),
        },
        geocoder: LocationIqConfig {
            api_key: "unused".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        },
    }
}

/// Database pool plus handles on the fakes, so tests can inspect side effects.
pub struct TestApp {
    pub pool: PgPool,
    pub images: Arc<FakeImageStore>,
    config: ServerConfig,
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            images: Arc::new(FakeImageStore::default()),
            config: test_config(),
        }
    }

    /// A fresh router over the shared state; `oneshot` consumes it.
    pub fn router(&self) -> Router {
        let state = AppState {
            pool: self.pool.clone(),
            config: Arc::new(self.config.clone()),
            geocoder: Arc::new(FakeGeocoder),
            images: self.images.clone(),
        };
        build_app_router(state, &self.config)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Read the full response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::patch(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// A file part for [`post_multipart`].
pub struct FilePart<'a> {
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub fn png() -> FilePart<'static> {
    FilePart {
        content_type: "image/png",
        bytes: PNG_BYTES,
    }
}

const BOUNDARY: &str = "placebook-test-boundary";

/// Encode text fields and an optional `image` part as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload\"\r\nContent-Type: {}\r\n\r\n",
                file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<FilePart<'_>>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::post(uri).header(
        "content-type",
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(multipart_body(fields, image)))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up through the API and return `(user_id, token)`.
pub async fn signup(app: &TestApp, name: &str, email: &str) -> (i64, String) {
    let response = post_multipart(
        app.router(),
        "/api/users/signup",
        &[("name", name), ("email", email), ("password", "password123")],
        Some(png()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["userId"].as_i64().unwrap(),
        json["token"].as_str().unwrap().to_string(),
    )
}

/// Create a place through the API and return its JSON.
pub async fn create_place(app: &TestApp, token: &str, title: &str) -> serde_json::Value {
    let response = post_multipart(
        app.router(),
        "/api/places",
        &[
            ("title", title),
            ("description", "A place worth seeing"),
            ("address", "20 W 34th St, New York"),
        ],
        Some(png()),
        Some(token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["place"].clone()
}

use std::sync::Arc;

use placebook_cloud::{Geocoder, ImageStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: placebook_db::DbPool,
    /// Server configuration (JWT settings, upload limit).
    pub config: Arc<ServerConfig>,
    /// Address to coordinates lookup.
    pub geocoder: Arc<dyn Geocoder>,
    /// Place and profile image storage.
    pub images: Arc<dyn ImageStore>,
}

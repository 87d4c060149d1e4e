use std::net::SocketAddr;
use std::sync::Arc;

use placebook_cloud::geocoding::LocationIqGeocoder;
use placebook_cloud::storage::{CloudinaryStore, LocalImageStore};
use placebook_cloud::{Geocoder, ImageStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use placebook_api::config::{ServerConfig, StorageConfig};
use placebook_api::router::{build_app_router, UPLOADS_ROUTE};
use placebook_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placebook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = placebook_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    placebook_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    placebook_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Outbound services ---
    let geocoder: Arc<dyn Geocoder> = Arc::new(
        LocationIqGeocoder::new(config.geocoder.clone())
            .expect("Failed to build geocoding HTTP client"),
    );

    let images: Arc<dyn ImageStore> = match &config.storage {
        StorageConfig::Local { upload_dir } => {
            tracing::info!(dir = %upload_dir.display(), "Storing images on local disk");
            Arc::new(LocalImageStore::new(upload_dir.clone(), UPLOADS_ROUTE))
        }
        StorageConfig::Cloudinary(cloudinary) => {
            tracing::info!(cloud = %cloudinary.cloud_name, "Storing images on Cloudinary");
            Arc::new(
                CloudinaryStore::new(cloudinary.clone())
                    .expect("Failed to build Cloudinary HTTP client"),
            )
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        geocoder,
        images,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

//! Address geocoding.

use async_trait::async_trait;
use placebook_core::geo::Coordinates;

pub mod locationiq;

pub use locationiq::{LocationIqConfig, LocationIqGeocoder};

/// Errors from a geocoding provider.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The provider answered but found nothing for the address.
    #[error("Could not fetch coordinates for the address.")]
    NoResults,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Geocoding API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response could not be interpreted as coordinates.
    #[error("Malformed geocoding response: {0}")]
    Malformed(String),
}

/// Resolves a free-form address to a single point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up the best match for `address`.
    async fn coordinates_for(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

//! Outbound adapters for the third-party services Placebook depends on.
//!
//! - [`geocoding`] -- address to coordinates lookup ([`Geocoder`]).
//! - [`storage`] -- image upload and deletion ([`ImageStore`]).
//!
//! Handlers only see the traits; the binary picks the concrete providers
//! from configuration and tests substitute in-memory fakes.

pub mod geocoding;
pub mod storage;

pub use geocoding::{GeocodeError, Geocoder};
pub use storage::{ImageStore, ImageStoreError, ImageUpload, StoredImage};

//! Geographic coordinates attached to every place.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A WGS84 point as returned by the geocoder and stored on a place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Build a point, rejecting values outside the valid latitude/longitude range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::invalid(format!("Latitude {lat} is out of range")));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::invalid(format!("Longitude {lng} is out of range")));
        }
        Ok(Self { lat, lng })
    }

    /// Parse the string-encoded pair most geocoding APIs return.
    pub fn parse(lat: &str, lng: &str) -> Result<Self, CoreError> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoreError::invalid(format!("Latitude '{lat}' is not a number")))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| CoreError::invalid(format!("Longitude '{lng}' is not a number")))?;
        Self::new(lat, lng)
    }
}

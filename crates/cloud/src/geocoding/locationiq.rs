//! LocationIQ forward-geocoding client.
//!
//! Wraps `GET {base}/search?key=..&q=..&format=json` using [`reqwest`] and
//! keeps only the first (best ranked) hit.

use std::time::Duration;

use async_trait::async_trait;
use placebook_core::geo::Coordinates;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{GeocodeError, Geocoder};

/// Default LocationIQ region endpoint.
const DEFAULT_BASE_URL: &str = "https://us1.locationiq.com/v1";
/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the LocationIQ client.
#[derive(Debug, Clone)]
pub struct LocationIqConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl LocationIqConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default                          |
    /// |--------------------------|----------|----------------------------------|
    /// | `LOCATION_IQ_API_KEY`    | **yes**  | --                               |
    /// | `LOCATION_IQ_BASE_URL`   | no       | `https://us1.locationiq.com/v1`  |
    /// | `GEOCODER_TIMEOUT_SECS`  | no       | `10`                             |
    ///
    /// # Panics
    ///
    /// Panics if `LOCATION_IQ_API_KEY` is missing or empty, or the timeout is not a number.
    pub fn from_env() -> Self {
        let api_key = std::env::var("LOCATION_IQ_API_KEY")
            .expect("LOCATION_IQ_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "LOCATION_IQ_API_KEY must not be empty");

        let base_url = std::env::var("LOCATION_IQ_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("GEOCODER_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GEOCODER_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            base_url,
            timeout_secs,
        }
    }
}

/// One entry of the search response. LocationIQ encodes numbers as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Body of a search response: either a hit list or an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Hits(Vec<SearchHit>),
    Error { error: String },
}

/// [`Geocoder`] backed by the LocationIQ search API.
pub struct LocationIqGeocoder {
    client: reqwest::Client,
    config: LocationIqConfig,
}

impl LocationIqGeocoder {
    /// Build a client with the configured request timeout.
    pub fn new(config: LocationIqConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Geocoder for LocationIqGeocoder {
    async fn coordinates_for(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", address),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        // LocationIQ answers 404 `{"error": "Unable to geocode"}` for unknown addresses.
        if status == StatusCode::NOT_FOUND {
            return Err(GeocodeError::NoResults);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let coordinates = parse_search_response(&body)?;
        tracing::debug!(lat = coordinates.lat, lng = coordinates.lng, "Address geocoded");
        Ok(coordinates)
    }
}

/// Extract the first hit of a LocationIQ search body.
fn parse_search_response(body: &str) -> Result<Coordinates, GeocodeError> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    match parsed {
        SearchResponse::Error { error } => {
            tracing::debug!(%error, "Geocoder reported no match");
            Err(GeocodeError::NoResults)
        }
        SearchResponse::Hits(hits) => {
            let first = hits.into_iter().next().ok_or(GeocodeError::NoResults)?;
            Coordinates::parse(&first.lat, &first.lon)
                .map_err(|e| GeocodeError::Malformed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn takes_first_hit() {
        let body = r#"[
            {"place_id": "1", "lat": "40.7484284", "lon": "-73.9856546", "display_name": "Empire State Building"},
            {"place_id": "2", "lat": "1.0", "lon": "2.0"}
        ]"#;
        let point = parse_search_response(body).unwrap();
        assert_eq!(point.lat, 40.7484284);
        assert_eq!(point.lng, -73.9856546);
    }

    #[test]
    fn empty_list_is_no_results() {
        assert_matches!(parse_search_response("[]"), Err(GeocodeError::NoResults));
    }

    #[test]
    fn error_object_is_no_results() {
        assert_matches!(
            parse_search_response(r#"{"error": "Unable to geocode"}"#),
            Err(GeocodeError::NoResults)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_matches!(parse_search_response("<html>"), Err(GeocodeError::Malformed(_)));
        assert_matches!(
            parse_search_response(r#"[{"lat": "abc", "lon": "1"}]"#),
            Err(GeocodeError::Malformed(_))
        );
    }
}

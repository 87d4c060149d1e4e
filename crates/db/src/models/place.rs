//! Place entity model and DTOs.

use placebook_core::geo::Coordinates;
use placebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `places` table.
#[derive(Debug, Clone, FromRow)]
pub struct Place {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub image: String,
    pub creator_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Place {
    pub fn location(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// API shape of a place: coordinates nested under `location`, owner under `creator`.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image: String,
    pub creator: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        let location = place.location();
        Self {
            id: place.id,
            title: place.title,
            description: place.description,
            address: place.address,
            location,
            image: place.image,
            creator: place.creator_id,
            created_at: place.created_at,
            updated_at: place.updated_at,
        }
    }
}

/// DTO for inserting a place once its address is geocoded and image stored.
#[derive(Debug)]
pub struct CreatePlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image: String,
    pub creator_id: DbId,
}

/// DTO for `PATCH /places/{id}`: only title and description are editable.
#[derive(Debug, Deserialize)]
pub struct UpdatePlace {
    pub title: String,
    pub description: String,
}

//! Response envelope types for API handlers.
//!
//! Each resource is returned under its own key (`{"place": ...}`,
//! `{"places": [...]}`, `{"users": [...]}`) so the shapes are checked at
//! compile time instead of built with ad-hoc `json!` calls.

use placebook_core::types::DbId;
use placebook_db::models::place::PlaceResponse;
use placebook_db::models::user::UserResponse;
use serde::Serialize;

/// `{ "place": ... }`
#[derive(Debug, Serialize)]
pub struct PlaceEnvelope {
    pub place: PlaceResponse,
}

/// `{ "places": [...] }`
#[derive(Debug, Serialize)]
pub struct PlacesEnvelope {
    pub places: Vec<PlaceResponse>,
}

/// `{ "users": [...] }`
#[derive(Debug, Serialize)]
pub struct UsersEnvelope {
    pub users: Vec<UserResponse>,
}

/// `{ "message": ... }` for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Returned by signup and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: DbId,
    pub email: String,
    pub token: String,
}

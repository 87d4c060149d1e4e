//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the database row, a
//! `Serialize` response shape for the API, and the input DTOs repositories
//! accept.

pub mod place;
pub mod user;

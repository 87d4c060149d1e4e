//! Domain types and pure business rules for the Placebook service.
//!
//! Nothing in this crate touches the database or the network; handlers and
//! repositories call into it so the rules can be unit tested in isolation.

pub mod error;
pub mod geo;
pub mod image;
pub mod place;
pub mod types;
pub mod user;

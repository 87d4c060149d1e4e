pub mod places;
pub mod upload;
pub mod users;

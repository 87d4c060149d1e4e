pub mod health;
pub mod places;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                     list (public)
/// /users/signup              signup, multipart (public)
/// /users/login               login (public)
///
/// /places                    create, multipart (requires auth)
/// /places/{id}               get (public); patch, delete (creator only)
/// /places/user/{user_id}     list a user's places (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/places", places::router())
}

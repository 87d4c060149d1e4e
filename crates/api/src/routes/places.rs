//! Route definitions for the `/places` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::places;
use crate::state::AppState;

/// Routes mounted at `/places`.
///
/// ```text
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PATCH  /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /user/{user_id}    -> list_by_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(places::create))
        .route(
            "/{id}",
            get(places::get_by_id)
                .patch(places::update)
                .delete(places::delete),
        )
        .route("/user/{user_id}", get(places::list_by_user))
}

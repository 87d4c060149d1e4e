//! Handlers for the `/places` resource.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use placebook_core::error::CoreError;
use placebook_core::image::ImageFolder;
use placebook_core::place::{ensure_creator, validate_new_place, validate_place_update};
use placebook_core::types::DbId;
use placebook_db::models::place::{CreatePlace, Place, UpdatePlace};
use placebook_db::repositories::{PlaceRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::upload::{discard_orphaned_image, prepare_upload, UploadForm};
use crate::middleware::auth::AuthUser;
use crate::response::{MessageResponse, PlaceEnvelope, PlacesEnvelope};
use crate::state::AppState;

/// GET /api/places/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<PlaceEnvelope>> {
    let place = find_place(&state, id).await?;
    Ok(Json(PlaceEnvelope {
        place: place.into(),
    }))
}

/// GET /api/places/user/{user_id}
///
/// Places in the order the user added them. An unknown user is a 404; a
/// known user without places gets an empty list.
pub async fn list_by_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<DbId>,
) -> AppResult<Json<PlacesEnvelope>> {
    if !UserRepo::exists(&state.pool, user_id).await? {
        return Err(AppError::Core(CoreError::not_found("User", user_id)));
    }

    let places = PlaceRepo::list_by_user(&state.pool, user_id).await?;
    Ok(Json(PlacesEnvelope {
        places: places.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/places
///
/// Multipart form with `title`, `description`, `address` and an `image`
/// file. The address is geocoded and the image stored before the place and
/// the creator's list entry are written in one transaction.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<PlaceEnvelope>)> {
    let mut form = UploadForm::read(&mut multipart).await?;

    let title = form.text("title");
    let description = form.text("description");
    let address = form.text("address");
    validate_new_place(&title, &description, &address)?;

    let image = form
        .take_image()
        .ok_or_else(|| CoreError::invalid("Place image is required"))?;
    let upload = prepare_upload(image, ImageFolder::Places, state.config.max_upload_bytes)?;

    let location = state.geocoder.coordinates_for(&address).await?;

    if !UserRepo::exists(&state.pool, auth.user_id).await? {
        return Err(AppError::Core(CoreError::not_found("User", auth.user_id)));
    }

    let stored = state.images.upload(upload).await?;

    let input = CreatePlace {
        title,
        description,
        address,
        location,
        image: stored.url,
        creator_id: auth.user_id,
    };
    let place = match PlaceRepo::create_for_creator(&state.pool, &input).await {
        Ok(Some(place)) => place,
        Ok(None) => {
            discard_orphaned_image(state.images.as_ref(), &input.image).await;
            return Err(AppError::Core(CoreError::not_found("User", auth.user_id)));
        }
        Err(e) => {
            discard_orphaned_image(state.images.as_ref(), &input.image).await;
            return Err(e.into());
        }
    };

    tracing::info!(place_id = place.id, creator_id = auth.user_id, "Place created");
    Ok((
        StatusCode::CREATED,
        Json(PlaceEnvelope {
            place: place.into(),
        }),
    ))
}

/// PATCH /api/places/{id}
///
/// Only the creator may edit, and only `title` and `description`.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdatePlace>,
) -> AppResult<Json<PlaceEnvelope>> {
    validate_place_update(&input.title, &input.description)?;

    let existing = find_place(&state, id).await?;
    ensure_creator(existing.creator_id, auth.user_id, "edit")?;

    let input = UpdatePlace {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
    };
    let place = PlaceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Place", id)))?;

    tracing::info!(place_id = id, "Place updated");
    Ok(Json(PlaceEnvelope {
        place: place.into(),
    }))
}

/// DELETE /api/places/{id}
///
/// Removes the place and its entry in the creator's list, then deletes the
/// stored image. A failed image delete is logged and does not fail the request.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let place = find_place(&state, id).await?;
    ensure_creator(place.creator_id, auth.user_id, "delete")?;

    let deleted = PlaceRepo::delete_with_owner_link(&state.pool, id, auth.user_id).await?;
    if !deleted {
        // Removed concurrently between the lookup and the transaction.
        return Err(AppError::Core(CoreError::not_found("Place", id)));
    }
    tracing::info!(place_id = id, creator_id = auth.user_id, "Place deleted");

    if let Err(e) = state.images.delete(&place.image).await {
        tracing::error!(error = %e, place_id = id, url = %place.image, "Failed to delete place image");
    }

    Ok(Json(MessageResponse {
        message: "Deleted place.",
    }))
}

async fn find_place(state: &AppState, id: DbId) -> AppResult<Place> {
    PlaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Place", id)))
}

//! Handlers for the `/users` resource (listing, signup, login).

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use placebook_core::error::CoreError;
use placebook_core::image::ImageFolder;
use placebook_core::user::{normalize_email, validate_signup};
use placebook_db::models::user::{CreateUser, User};
use placebook_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::upload::{discard_orphaned_image, prepare_upload, UploadForm};
use crate::response::{AuthResponse, UsersEnvelope};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "User exists already, please login instead.";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<UsersEnvelope>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(UsersEnvelope {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/users/signup
///
/// Multipart form with `name`, `email`, `password` and an `image` file. The
/// profile picture is uploaded before the user row is written; if the insert
/// fails the picture is removed again.
pub async fn signup(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let mut form = UploadForm::read(&mut multipart).await?;

    let name = form.text("name");
    let email = normalize_email(form.raw("email"));
    let password = form.raw("password").to_string();
    validate_signup(&name, &email, &password)?;

    let image = form
        .take_image()
        .ok_or_else(|| CoreError::invalid("Profile image is required"))?;
    let upload = prepare_upload(image, ImageFolder::Profiles, state.config.max_upload_bytes)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(CoreError::Conflict(EMAIL_TAKEN.into()).into());
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))?;

    let stored = state.images.upload(upload).await?;

    let input = CreateUser {
        name,
        email,
        password_hash,
        image: stored.url,
    };
    let user = match UserRepo::create(&state.pool, &input).await {
        Ok(user) => user,
        Err(e) => {
            discard_orphaned_image(state.images.as_ref(), &input.image).await;
            if is_unique_violation(&e, "uq_users_email") {
                return Err(CoreError::Conflict(EMAIL_TAKEN.into()).into());
            }
            return Err(e.into());
        }
    };

    tracing::info!(user_id = user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(auth_response(&state, &user)?)))
}

/// POST /api/users/login
///
/// An unknown email and a wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash is invalid: {e}")))?;
    if !matches {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(auth_response(&state, &user)?))
}

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = generate_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to issue token: {e}")))?;
    Ok(AuthResponse {
        user_id: user.id,
        email: user.email.clone(),
        token,
    })
}

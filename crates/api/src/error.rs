use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use placebook_cloud::{GeocodeError, ImageStoreError};
use placebook_core::error::CoreError;
use serde_json::json;

/// Message returned for any request that matches no route.
pub const ROUTE_NOT_FOUND: &str = "Could not find this route.";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the outbound adapter errors, and
/// adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `placebook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The geocoding provider failed or found nothing.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// The image storage backend failed.
    #[error(transparent)]
    ImageStore(#[from] ImageStoreError),

    /// The multipart body could not be read (malformed or over the size limit).
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// The JSON body was missing, malformed or had the wrong shape.
    #[error(transparent)]
    Json(#[from] JsonRejection),

    /// A path parameter could not be parsed.
    #[error(transparent)]
    Path(#[from] PathRejection),

    /// No route matched the request.
    #[error("Could not find this route.")]
    RouteNotFound,

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    msg.clone(),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Outbound adapters ---
            AppError::Geocode(GeocodeError::NoResults) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                GeocodeError::NoResults.to_string(),
            ),
            AppError::Geocode(err) => {
                tracing::error!(error = %err, "Geocoding failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Geocoding service is unavailable".to_string(),
                )
            }
            AppError::ImageStore(ImageStoreError::Io(err)) => {
                tracing::error!(error = %err, "Image storage I/O error");
                internal()
            }
            AppError::ImageStore(err) => {
                tracing::error!(error = %err, "Image storage failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Image storage service is unavailable".to_string(),
                )
            }

            // --- Extractor rejections ---
            AppError::Multipart(err) => {
                let status = err.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_REQUEST"
                };
                (status, code, err.body_text())
            }
            AppError::Json(rejection) => {
                let code = if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
                    "VALIDATION_ERROR"
                } else {
                    "BAD_REQUEST"
                };
                (rejection.status(), code, rejection.body_text())
            }
            AppError::Path(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }

            // --- HTTP-specific errors ---
            AppError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                ROUTE_NOT_FOUND.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Whether `err` is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

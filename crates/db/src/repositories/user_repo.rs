//! Repository for the `users` table.

use placebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries. Every query aliases `users` as `u`;
/// `places` is aggregated from the link table in list order.
const COLUMNS: &str = "u.id, u.name, u.email, u.password_hash, u.image, \
                       ARRAY(SELECT up.place_id FROM user_places up \
                             WHERE up.user_id = u.id ORDER BY up.position) AS places, \
                       u.created_at, u.updated_at";

/// Provides read and create operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row (with an empty place list).
    ///
    /// A duplicate email surfaces as a database error on `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users AS u (name, email, password_hash, image)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by normalized email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users u WHERE u.email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether a user with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// List all users, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users u ORDER BY u.created_at, u.id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }
}

//! Repository for the `places` table and the `user_places` ownership list.

use placebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::place::{CreatePlace, Place, UpdatePlace};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, address, lat, lng, image, creator_id, \
                       created_at, updated_at";

/// Same columns qualified with the `p` alias, for joins.
const P_COLUMNS: &str = "p.id, p.title, p.description, p.address, p.lat, p.lng, p.image, \
                         p.creator_id, p.created_at, p.updated_at";

/// Provides CRUD operations for places.
pub struct PlaceRepo;

impl PlaceRepo {
    /// Find a place by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE id = $1");
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the places owned by a user, in the order they were added to the
    /// user's list.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Place>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}
             FROM user_places up
             JOIN places p ON p.id = up.place_id
             WHERE up.user_id = $1
             ORDER BY up.position"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a place and append it to its creator's place list in a single
    /// transaction.
    ///
    /// The creator row is locked for the duration so concurrent creations by
    /// the same user get consecutive list positions. Returns `None` (and
    /// writes nothing) if the creator does not exist.
    pub async fn create_for_creator(
        pool: &PgPool,
        input: &CreatePlace,
    ) -> Result<Option<Place>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let creator: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(input.creator_id)
                .fetch_optional(&mut *tx)
                .await?;
        if creator.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO places (title, description, address, lat, lng, image, creator_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let place = sqlx::query_as::<_, Place>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.address)
            .bind(input.location.lat)
            .bind(input.location.lng)
            .bind(&input.image)
            .bind(input.creator_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO user_places (user_id, place_id, position)
             SELECT $1, $2, COALESCE(MAX(position), 0) + 1
             FROM user_places WHERE user_id = $1",
        )
        .bind(input.creator_id)
        .bind(place.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(place_id = place.id, creator_id = place.creator_id, "Place created");
        Ok(Some(place))
    }

    /// Update a place's title and description.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlace,
    ) -> Result<Option<Place>, sqlx::Error> {
        let query = format!(
            "UPDATE places SET title = $2, description = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Remove a place from its creator's list and delete it, in a single
    /// transaction.
    ///
    /// Returns `false` (and writes nothing) if no place with `id` owned by
    /// `creator_id` exists.
    pub async fn delete_with_owner_link(
        pool: &PgPool,
        id: DbId,
        creator_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM user_places WHERE place_id = $1 AND user_id = $2")
            .bind(id)
            .bind(creator_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM places WHERE id = $1 AND creator_id = $2")
            .bind(id)
            .bind(creator_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        tracing::debug!(place_id = id, creator_id, "Place deleted");
        Ok(true)
    }
}

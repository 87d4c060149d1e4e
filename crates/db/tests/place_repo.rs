//! Repository tests for places and the ordered ownership list.

use placebook_core::geo::Coordinates;
use placebook_db::models::place::{CreatePlace, UpdatePlace};
use placebook_db::models::user::{CreateUser, User};
use placebook_db::repositories::{PlaceRepo, UserRepo};
use sqlx::PgPool;

async fn create_user(pool: &PgPool, email: &str) -> User {
    let input = CreateUser {
        name: "Max".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        image: "https://img.test/profile.png".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

fn new_place(creator_id: i64, title: &str) -> CreatePlace {
    CreatePlace {
        title: title.to_string(),
        description: "A place worth visiting".to_string(),
        address: "20 W 34th St, New York".to_string(),
        location: Coordinates {
            lat: 40.7484405,
            lng: -73.9856644,
        },
        image: format!("https://img.test/{title}.png"),
        creator_id,
    }
}

async fn link_count(pool: &PgPool, place_id: i64) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_places WHERE place_id = $1")
        .bind(place_id)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_appends_to_creator_list(pool: PgPool) {
    let user = create_user(&pool, "owner@test.com").await;

    let first = PlaceRepo::create_for_creator(&pool, &new_place(user.id, "first"))
        .await
        .unwrap()
        .expect("creator exists");
    let second = PlaceRepo::create_for_creator(&pool, &new_place(user.id, "second"))
        .await
        .unwrap()
        .expect("creator exists");

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.places, vec![first.id, second.id]);

    let listed = PlaceRepo::list_by_user(&pool, user.id).await.unwrap();
    let titles: Vec<_> = listed.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["first", "second"]);
    assert_eq!(listed[0].location().lat, 40.7484405);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_for_missing_creator_writes_nothing(pool: PgPool) {
    let result = PlaceRepo::create_for_creator(&pool, &new_place(999_999, "orphan"))
        .await
        .unwrap();
    assert!(result.is_none());

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM places")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_create_rolls_back_place(pool: PgPool) {
    let user = create_user(&pool, "rollback@test.com").await;

    // Out-of-range latitude violates a CHECK constraint after the creator lock.
    let mut input = new_place(user.id, "broken");
    input.location.lat = 120.0;
    let result = PlaceRepo::create_for_creator(&pool, &input).await;
    assert!(result.is_err());

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.places.is_empty());
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM places")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_changes_title_and_description(pool: PgPool) {
    let user = create_user(&pool, "editor@test.com").await;
    let place = PlaceRepo::create_for_creator(&pool, &new_place(user.id, "old"))
        .await
        .unwrap()
        .unwrap();

    let input = UpdatePlace {
        title: "new".to_string(),
        description: "Renovated description".to_string(),
    };
    let updated = PlaceRepo::update(&pool, place.id, &input).await.unwrap().unwrap();
    assert_eq!(updated.title, "new");
    assert_eq!(updated.description, "Renovated description");
    assert_eq!(updated.address, place.address);

    let missing = PlaceRepo::update(&pool, 999_999, &input).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_removes_place_and_link(pool: PgPool) {
    let user = create_user(&pool, "deleter@test.com").await;
    let keep = PlaceRepo::create_for_creator(&pool, &new_place(user.id, "keep"))
        .await
        .unwrap()
        .unwrap();
    let dropped = PlaceRepo::create_for_creator(&pool, &new_place(user.id, "drop"))
        .await
        .unwrap()
        .unwrap();

    let deleted = PlaceRepo::delete_with_owner_link(&pool, dropped.id, user.id)
        .await
        .unwrap();
    assert!(deleted);

    assert!(PlaceRepo::find_by_id(&pool, dropped.id).await.unwrap().is_none());
    assert_eq!(link_count(&pool, dropped.id).await, 0);
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.places, vec![keep.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_non_creator_is_noop(pool: PgPool) {
    let owner = create_user(&pool, "owner2@test.com").await;
    let other = create_user(&pool, "other@test.com").await;
    let place = PlaceRepo::create_for_creator(&pool, &new_place(owner.id, "mine"))
        .await
        .unwrap()
        .unwrap();

    let deleted = PlaceRepo::delete_with_owner_link(&pool, place.id, other.id)
        .await
        .unwrap();
    assert!(!deleted);
    assert!(PlaceRepo::find_by_id(&pool, place.id).await.unwrap().is_some());
    assert_eq!(link_count(&pool, place.id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_place_cannot_be_deleted_while_listed(pool: PgPool) {
    let user = create_user(&pool, "guard@test.com").await;
    let place = PlaceRepo::create_for_creator(&pool, &new_place(user.id, "guarded"))
        .await
        .unwrap()
        .unwrap();

    let result = sqlx::query("DELETE FROM places WHERE id = $1")
        .bind(place.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "link table must block a bare place delete");
}

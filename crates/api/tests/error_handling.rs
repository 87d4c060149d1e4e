//! Cross-cutting HTTP behaviour: fallback route, health, request ids, CORS.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, TestApp};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_json_404(pool: PgPool) {
    let app = TestApp::new(pool);

    let response = get(app.router(), "/api/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Could not find this route.");
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_method_is_not_a_server_error(pool: PgPool) {
    let app = TestApp::new(pool);

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/users")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let app = TestApp::new(pool);

    let response = get(app.router(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn responses_carry_request_id(pool: PgPool) {
    let app = TestApp::new(pool);

    let response = get(app.router(), "/health").await;
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::get("/health")
        .header("x-request-id", "fixed-id-123")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "fixed-id-123");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let app = TestApp::new(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/places/1")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "PATCH")
        .header("access-control-request-headers", "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    let methods = response.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap();
    assert!(methods.contains("PATCH"));
    assert!(methods.contains("DELETE"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_bearer_header_is_unauthorized(pool: PgPool) {
    let app = TestApp::new(pool);

    let request = Request::delete("/api/places/1")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

//! Tests for the error envelope: every failure mode answers with
//! `{"error": ..., "code": ...}` and the right status.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{assert_error_body, get, post_json};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../db/migrations")]
async fn validation_failure_maps_to_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "name": "X", "phone": "5551112222" });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_error_body(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_user_maps_to_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "phone": "5550001111" });
    let response = post_json(app, "/api/auth/otp/send", body).await;
    assert_error_body(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_credentials_map_to_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/auth/me").await;
    assert_error_body(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_registration_maps_to_409(pool: PgPool) {
    let body = serde_json::json!({ "name": "Dup User", "phone": "5553334444" });
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/auth/register", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/register", body).await;
    assert_error_body(response, StatusCode::CONFLICT, "CONFLICT").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_json_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rate_limit_maps_to_429(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Limited", "phone": "5555556666" });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let send = serde_json::json!({ "phone": "5555556666" });
    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/auth/otp/send", send.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/otp/send", send).await;
    assert_error_body(response, StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED").await;
}

use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error;
use sea_orm::DbErr;
use serde_json::json;

use crate::support::auth::{bearer, expired_bearer, foreign_bearer};
use crate::support::rows::{db, none, user};
use crate::support::test_app;

fn new_game() -> serde_json::Value {
    json!({
        "name": "Hades",
        "category": "roguelike",
        "description": "Escape the underworld",
        "studio": "Supergiant",
        "year": 2020
    })
}

#[actix_web::test]
async fn missing_header_is_invalid_token() {
    let app = test_app(db()).await;

    let req = test::TestRequest::post()
        .uri("/games")
        .set_json(new_game())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::UNAUTHORIZED, "invalid token").await;
}

#[actix_web::test]
async fn malformed_header_is_invalid_token() {
    let app = test_app(db()).await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, "Token abc"))
        .set_json(new_game())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::UNAUTHORIZED, "invalid token").await;
}

#[actix_web::test]
async fn expired_token_is_reported_as_expired() {
    let app = test_app(db()).await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, expired_bearer(1)))
        .set_json(new_game())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::UNAUTHORIZED, "expired token").await;
}

#[actix_web::test]
async fn token_signed_elsewhere_is_invalid() {
    let app = test_app(db()).await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, foreign_bearer(1)))
        .set_json(new_game())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::UNAUTHORIZED, "invalid token").await;
}

#[actix_web::test]
async fn deleted_user_token_is_invalid() {
    let app = test_app(db().append_query_results([none()])).await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, bearer(42)))
        .set_json(new_game())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::UNAUTHORIZED, "invalid token").await;
}

#[actix_web::test]
async fn non_admin_cannot_create_games() {
    let app = test_app(db().append_query_results([vec![user(2, "bob", false)]])).await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, bearer(2)))
        .set_json(new_game())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::UNAUTHORIZED, "Insufficient permissions").await;
}

#[actix_web::test]
async fn non_admin_may_still_rate() {
    // Authenticate only; the game lookup fails so the chain stops at validation.
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([none()]),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/games/5/ratings")
        .insert_header((AUTHORIZATION, bearer(2)))
        .set_json(json!({"rating": 4}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn user_lookup_failure_is_a_generic_500() {
    let app = test_app(db().append_query_errors([DbErr::Custom(
        "relation \"users\" does not exist".into(),
    )]))
    .await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(new_game())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").await;
}

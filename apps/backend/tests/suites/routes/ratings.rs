use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::{assert_error, assert_errors};
use sea_orm::{DbErr, RuntimeErr};
use serde_json::json;

use crate::support::auth::bearer;
use crate::support::rows::{db, game, none, rating, user};
use crate::support::{call_json, test_app};

fn rate(method: test::TestRequest, game_id: i64, value: serde_json::Value) -> actix_http::Request {
    method
        .uri(&format!("/games/{game_id}/ratings"))
        .insert_header((AUTHORIZATION, bearer(2)))
        .set_json(json!({ "rating": value }))
        .to_request()
}

#[actix_web::test]
async fn ratings_of_a_game_are_public() {
    let app = test_app(
        db().append_query_results([vec![game(5, "Outer Wilds", 2019)]])
            .append_query_results([vec![rating(1, 5, 4), rating(2, 5, 5)]]),
    )
    .await;

    let (status, body) = call_json(
        &app,
        test::TestRequest::get().uri("/games/5/ratings").to_request(),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([
            {"user_id": 1, "game_id": 5, "rating": 4},
            {"user_id": 2, "game_id": 5, "rating": 5}
        ])
    );
}

#[actix_web::test]
async fn first_rating_is_created() {
    // user, game, no existing rating, inserted row
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([vec![game(5, "Outer Wilds", 2019)]])
            .append_query_results([none()])
            .append_query_results([vec![rating(2, 5, 4)]]),
    )
    .await;

    let (status, body) = call_json(&app, rate(test::TestRequest::post(), 5, json!(4))).await;

    assert_eq!(status, 201);
    assert_eq!(body, json!({"user_id": 2, "game_id": 5, "rating": 4}));
}

#[actix_web::test]
async fn rating_twice_is_rejected() {
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([vec![game(5, "Outer Wilds", 2019)]])
            .append_query_results([vec![rating(2, 5, 3)]]),
    )
    .await;

    let resp = test::call_service(&app, rate(test::TestRequest::post(), 5, json!(4))).await;
    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["You have already rated this game"],
    )
    .await;
    assert_eq!(errors[0]["location"], "params");
    assert_eq!(errors[0]["param"], "id");
}

#[actix_web::test]
async fn concurrent_duplicate_hits_the_primary_key() {
    // The pre-check sees nothing, but the insert loses the race.
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([vec![game(5, "Outer Wilds", 2019)]])
            .append_query_results([none()])
            .append_query_errors([DbErr::Exec(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \"pk_ratings\"".into(),
            ))]),
    )
    .await;

    let resp = test::call_service(&app, rate(test::TestRequest::post(), 5, json!(4))).await;
    assert_error(
        resp,
        StatusCode::BAD_REQUEST,
        "You have already rated this game",
    )
    .await;
}

#[actix_web::test]
async fn out_of_range_rating_is_rejected() {
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([vec![game(5, "Outer Wilds", 2019)]])
            .append_query_results([none()]),
    )
    .await;

    let resp = test::call_service(&app, rate(test::TestRequest::post(), 5, json!(7))).await;
    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["rating must be an integer, one of 0, 1, 2, 3, 4, 5"],
    )
    .await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["value"], 7);
}

#[actix_web::test]
async fn rating_a_missing_game_is_404() {
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([none()]),
    )
    .await;

    let resp = test::call_service(&app, rate(test::TestRequest::post(), 99, json!(3))).await;
    let errors = assert_errors(resp, StatusCode::NOT_FOUND, &["not found"]).await;
    assert_eq!(errors.len(), 1);
}

#[actix_web::test]
async fn changing_an_existing_rating() {
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([vec![game(5, "Outer Wilds", 2019)]])
            .append_query_results([vec![rating(2, 5, 3)]])
            .append_query_results([vec![rating(2, 5, 0)]]),
    )
    .await;

    let (status, body) = call_json(&app, rate(test::TestRequest::patch(), 5, json!(0))).await;

    assert_eq!(status, 200);
    assert_eq!(body["rating"], 0);
}

#[actix_web::test]
async fn changing_a_rating_that_does_not_exist() {
    let app = test_app(
        db().append_query_results([vec![user(2, "bob", false)]])
            .append_query_results([vec![game(5, "Outer Wilds", 2019)]])
            .append_query_results([none()]),
    )
    .await;

    let resp = test::call_service(&app, rate(test::TestRequest::patch(), 5, json!(2))).await;
    assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["You have not rated this game"],
    )
    .await;
}

#[actix_web::test]
async fn rating_requires_login() {
    let app = test_app(db()).await;

    let req = test::TestRequest::post()
        .uri("/games/5/ratings")
        .set_json(json!({"rating": 3}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::UNAUTHORIZED, "invalid token").await;
}

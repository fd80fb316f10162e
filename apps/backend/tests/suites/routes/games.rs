use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::{assert_error, assert_errors};
use sea_orm::{DbBackend, DbErr, Transaction};
use serde_json::json;

use crate::support::auth::bearer;
use crate::support::rows::{admin, db, deleted_id, game, none};
use crate::support::{call_json, executed, test_app, test_app_with_gateway};

const LIST_SQL: &str = "SELECT id, name, category, description, studio, year, image \
                        FROM games ORDER BY id ASC LIMIT $1 OFFSET $2";

fn hades() -> serde_json::Value {
    json!({
        "name": "Hades",
        "category": "roguelike",
        "description": "Escape the underworld",
        "studio": "Supergiant",
        "year": 2020
    })
}

#[actix_web::test]
async fn list_returns_games() {
    let app = test_app(
        db().append_query_results([vec![game(1, "Doom", 1993), game(2, "Quake", 1996)]]),
    )
    .await;

    let (status, body) =
        call_json(&app, test::TestRequest::get().uri("/games").to_request()).await;

    assert_eq!(status, 200);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[1]["name"], "Quake");
    assert_eq!(body[0]["image"], serde_json::Value::Null);
}

#[actix_web::test]
async fn list_caps_the_page_at_ten() {
    let (app, gateway) = test_app_with_gateway(db().append_query_results([none()])).await;

    let (status, body) = call_json(
        &app,
        test::TestRequest::get()
            .uri("/games?limit=1000&offset=3")
            .to_request(),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
    assert_eq!(
        executed(&gateway),
        vec![Transaction::from_sql_and_values(
            DbBackend::Postgres,
            LIST_SQL,
            [10i64.into(), 3i64.into()],
        )]
    );
}

#[actix_web::test]
async fn list_rejects_negative_offset() {
    let app = test_app(db()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/games?offset=-1").to_request(),
    )
    .await;
    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["offset must be an integer of at least 0"],
    )
    .await;
    assert_eq!(errors[0]["location"], "query");
    assert_eq!(errors[0]["value"], "-1");
}

#[actix_web::test]
async fn get_game_by_id() {
    let app = test_app(db().append_query_results([vec![game(4, "Celeste", 2018)]])).await;

    let (status, body) =
        call_json(&app, test::TestRequest::get().uri("/games/4").to_request()).await;

    assert_eq!(status, 200);
    assert_eq!(body["id"], 4);
    assert_eq!(body["name"], "Celeste");
    assert_eq!(body["year"], 2018);
}

#[actix_web::test]
async fn unknown_game_is_404_on_the_id_param() {
    let app = test_app(db().append_query_results([none()])).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/games/999999").to_request(),
    )
    .await;
    let errors = assert_errors(resp, StatusCode::NOT_FOUND, &["not found"]).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["location"], "params");
    assert_eq!(errors[0]["param"], "id");
    assert_eq!(errors[0]["value"], "999999");
}

#[actix_web::test]
async fn malformed_ids_never_reach_the_database() {
    let app = test_app(db()).await;

    for uri in ["/games/0", "/games/-4", "/games/abc"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_errors(
            resp,
            StatusCode::BAD_REQUEST,
            &["id must be an integer larger than 0"],
        )
        .await;
    }
}

#[actix_web::test]
async fn lookup_failure_is_a_server_error_without_value() {
    let app = test_app(db().append_query_errors([DbErr::Custom("connection reset".into())])).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/games/4").to_request())
        .await;
    let errors = assert_errors(resp, StatusCode::INTERNAL_SERVER_ERROR, &["server error"]).await;
    assert!(errors[0].get("value").is_none());
}

#[actix_web::test]
async fn admin_creates_a_game() {
    let app = test_app(
        db().append_query_results([vec![admin(1)]])
            .append_query_results([vec![game(12, "Hades", 2020)]]),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(hades())
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 201);
    assert_eq!(body["id"], 12);
    assert_eq!(body["name"], "Hades");
}

#[actix_web::test]
async fn games_before_1970_are_rejected_without_an_insert() {
    // Only the admin lookup is answered; an insert would find an empty mock.
    let app = test_app(db().append_query_results([vec![admin(1)]])).await;

    let mut game = hades();
    game["year"] = json!(1960);
    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(game)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["year must be between 1970 and 9999"],
    )
    .await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["value"], 1960);
}

#[actix_web::test]
async fn oversized_year_is_a_validation_error_on_create() {
    let app = test_app(db().append_query_results([vec![admin(1)]])).await;

    let mut game = hades();
    game["year"] = json!(3_000_000_000i64);
    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(game)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["year must be between 1970 and 9999"],
    )
    .await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["value"], 3_000_000_000i64);
}

#[actix_web::test]
async fn oversized_year_is_a_validation_error_on_patch() {
    // Admin and game lookups only; an update would find an empty mock.
    let app = test_app(
        db().append_query_results([vec![admin(1)]])
            .append_query_results([vec![game(4, "Celeste", 2018)]]),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri("/games/4")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(json!({"year": 3_000_000_000i64}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["year must be between 1970 and 9999"],
    )
    .await;
    assert_eq!(errors.len(), 1);
}

#[actix_web::test]
async fn create_reports_all_missing_fields() {
    let app = test_app(db().append_query_results([vec![admin(1)]])).await;

    let req = test::TestRequest::post()
        .uri("/games")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(json!({"name": "Hades"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &[
            "category must be between 1 and 10 characters",
            "description must be between 0 and 2048 characters",
            "studio must be between 1 and 30 characters",
            "year must be between 1970 and 9999",
        ],
    )
    .await;
    assert_eq!(errors.len(), 4);
}

#[actix_web::test]
async fn empty_patch_keeps_the_game_unchanged() {
    let stored = game(4, "Celeste", 2018);
    let (app, gateway) = test_app_with_gateway(
        db().append_query_results([vec![admin(1)]])
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![stored]]),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri("/games/4")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(json!({}))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    assert_eq!(body["name"], "Celeste");
    assert_eq!(body["year"], 2018);

    let log = executed(&gateway);
    assert_eq!(log.len(), 3);
    assert_eq!(
        log[2],
        Transaction::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE games SET name = $2, category = $3, description = $4, studio = $5, \
             year = $6, image = $7 WHERE id = $1 RETURNING id, name, category, description, \
             studio, year, image",
            [
                4i64.into(),
                "Celeste".into(),
                "rpg".into(),
                "A game".into(),
                "Studio".into(),
                2018i32.into(),
                sea_orm::Value::String(None),
            ],
        )
    );
}

#[actix_web::test]
async fn patch_validates_supplied_fields_only() {
    let app = test_app(
        db().append_query_results([vec![admin(1)]])
            .append_query_results([vec![game(4, "Celeste", 2018)]]),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri("/games/4")
        .insert_header((AUTHORIZATION, bearer(1)))
        .set_json(json!({"studio": "", "year": "2019"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &["studio must be between 1 and 30 characters"],
    )
    .await;
    assert_eq!(errors.len(), 1);
}

#[actix_web::test]
async fn admin_deletes_a_game() {
    let app = test_app(
        db().append_query_results([vec![admin(1)]])
            .append_query_results([vec![game(4, "Celeste", 2018)]])
            .append_query_results([vec![deleted_id(4)]]),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri("/games/4")
        .insert_header((AUTHORIZATION, bearer(1)))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 204);
    assert_eq!(body, serde_json::Value::Null);
}

#[actix_web::test]
async fn deleting_a_missing_game_is_404() {
    let app = test_app(
        db().append_query_results([vec![admin(1)]])
            .append_query_results([none()]),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri("/games/8")
        .insert_header((AUTHORIZATION, bearer(1)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_errors(resp, StatusCode::NOT_FOUND, &["not found"]).await;
}

#[actix_web::test]
async fn game_removed_between_lookup_and_delete_is_404() {
    let app = test_app(
        db().append_query_results([vec![admin(1)]])
            .append_query_results([vec![game(4, "Celeste", 2018)]])
            .append_query_results([none()]),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri("/games/4")
        .insert_header((AUTHORIZATION, bearer(1)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::NOT_FOUND, "not found").await;
}

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_errors;
use catalog_api::{verify_access_token, SecurityConfig};
use serde_json::json;

use crate::support::rows::{db, none, user};
use crate::support::{call_json, test_app};

#[actix_web::test]
async fn register_returns_a_token_for_the_new_user() {
    // username lookup finds nobody, then the insert returns the row
    let app = test_app(
        db().append_query_results([none()])
            .append_query_results([vec![user(7, "ann", false)]]),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({"username": "ann", "name": "Ann", "password": "secret1"}))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    let token = body["token"].as_str().expect("token in body");
    let claims = verify_access_token(token, &SecurityConfig::default()).unwrap();
    assert_eq!(claims.user_id(), Some(7));
}

#[actix_web::test]
async fn register_reports_every_bad_field_without_touching_the_database() {
    let app = test_app(db()).await;

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({"name": "Ann", "password": "abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let errors = assert_errors(
        resp,
        StatusCode::BAD_REQUEST,
        &[
            "username must be between 1 and 30 characters",
            "password must be between 6 and 128 characters",
        ],
    )
    .await;
    assert_eq!(errors.len(), 2);
    let password = errors
        .iter()
        .find(|e| e["param"] == "password")
        .expect("password error");
    assert_eq!(password["location"], "body");
    assert_eq!(password["value"], "abc");
}

#[actix_web::test]
async fn register_rejects_a_taken_username() {
    let app = test_app(db().append_query_results([vec![user(1, "ann", false)]])).await;

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({"username": "ann", "name": "Ann", "password": "secret1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let errors = assert_errors(resp, StatusCode::BAD_REQUEST, &["username already taken"]).await;
    assert_eq!(errors[0]["param"], "username");
    assert_eq!(errors[0]["value"], "ann");
}

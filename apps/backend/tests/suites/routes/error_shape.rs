use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error;

use crate::support::rows::db;
use crate::support::test_app;

#[actix_web::test]
async fn unknown_path_is_json_404() {
    let app = test_app(db()).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/consoles").to_request())
        .await;
    assert_error(resp, StatusCode::NOT_FOUND, "Not found").await;
}

#[actix_web::test]
async fn undeclared_method_on_known_path_is_405() {
    let app = test_app(db()).await;

    let resp = test::call_service(&app, test::TestRequest::put().uri("/games").to_request()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn malformed_json_is_rejected_before_any_step() {
    let app = test_app(db()).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"username": "ann", "password": }"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::BAD_REQUEST, "Invalid JSON at line 1").await;
}

#[actix_web::test]
async fn success_responses_carry_a_trace_id() {
    let app = test_app(db()).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header");
    assert!(uuid::Uuid::parse_str(trace_id).is_ok());
}

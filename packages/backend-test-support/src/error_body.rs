//! Assertions over the API's error contract.
//!
//! Every error response carries an `x-trace-id` header and a JSON body that is
//! either `{"error": "<message>"}` or `{"errors": [{"location", "param", "msg", ...}]}`.
//! These helpers operate on raw response parts so they don't depend on backend types.

use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde_json::Value;

fn assert_trace_header(headers: &HeaderMap) {
    let trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present and valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");
}

fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("error body should be valid JSON")
}

/// Assert a single-message error response: `{"error": expected_error}`.
pub async fn assert_error(resp: ServiceResponse, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    assert_trace_header(resp.headers());

    let body = parse_body(&actix_web::test::read_body(resp).await);
    assert_eq!(
        body["error"].as_str(),
        Some(expected_error),
        "unexpected error body: {body}"
    );
}

/// Assert an aggregated validation response and return its `errors` array.
///
/// `expected_msgs` must each appear as the `msg` of at least one entry.
pub async fn assert_errors(
    resp: ServiceResponse,
    expected_status: StatusCode,
    expected_msgs: &[&str],
) -> Vec<Value> {
    assert_eq!(resp.status(), expected_status);
    assert_trace_header(resp.headers());

    let body = parse_body(&actix_web::test::read_body(resp).await);
    let errors = body["errors"]
        .as_array()
        .unwrap_or_else(|| panic!("expected an errors array, got: {body}"))
        .clone();

    for msg in expected_msgs {
        assert!(
            errors.iter().any(|e| e["msg"].as_str() == Some(msg)),
            "expected an error with msg '{msg}', got: {body}"
        );
    }

    errors
}

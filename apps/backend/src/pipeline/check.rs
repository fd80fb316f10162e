//! Aggregated validation check: one status decision for all failures.

use actix_web::http::StatusCode;

use super::exchange::{Exchange, FieldError};
use super::resolve::{BAD_LOGIN, NOT_FOUND, SERVER_ERROR};
use crate::error::AppError;

/// Pick the response status for a set of failures.
///
/// `server error` beats `not found`, which beats a failed login; anything
/// else is a plain 400.
pub fn status_for(errors: &[FieldError]) -> StatusCode {
    let has = |msg: &str| errors.iter().any(|e| e.msg == msg);

    if has(SERVER_ERROR) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else if has(NOT_FOUND) {
        StatusCode::NOT_FOUND
    } else if has(BAD_LOGIN) {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::BAD_REQUEST
    }
}

/// Fail the request if any rule or resolver recorded an error.
pub fn check_validation(ex: &mut Exchange) -> Result<(), AppError> {
    if ex.errors.is_empty() {
        return Ok(());
    }
    let errors = std::mem::take(&mut ex.errors);
    Err(AppError::rejected(status_for(&errors), errors))
}

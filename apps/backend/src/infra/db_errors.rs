//! SeaORM -> DomainError translation helpers.
//!
//! The gateway and repositories convert `sea_orm::DbErr` into
//! `crate::errors::domain::DomainError` here; higher layers then map
//! `DomainError` to `AppError` via `From`.

use sea_orm::{ConnAcquireErr, DbErr};
use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map PostgreSQL unique constraint names to domain-specific conflicts.
fn map_unique_constraint(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("idx_users_username_unique") || error_msg.contains("users_username_key")
    {
        return Some((ConflictKind::UniqueUsername, "username already taken"));
    }
    if error_msg.contains("pk_ratings") {
        return Some((ConflictKind::RatingExists, "You have already rated this game"));
    }
    None
}

/// Map PostgreSQL foreign key names to the entity that went missing underneath us.
fn map_foreign_key(error_msg: &str) -> Option<(NotFoundKind, &'static str)> {
    if error_msg.contains("fk_ratings_game") {
        return Some((NotFoundKind::Game, "not found"));
    }
    if error_msg.contains("fk_ratings_user") {
        return Some((NotFoundKind::User, "not found"));
    }
    None
}

/// True when the error means the pool itself is unusable, not just this query.
pub fn is_fatal(e: &DbErr) -> bool {
    matches!(
        e,
        DbErr::Conn(_) | DbErr::ConnectionAcquire(ConnAcquireErr::ConnectionClosed)
    )
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Timed out acquiring a connection");
            return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");

        if let Some((kind, detail)) = map_unique_constraint(&error_msg) {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503")
        || error_msg.contains("violates foreign key constraint")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        if let Some((kind, detail)) = map_foreign_key(&error_msg) {
            return DomainError::not_found(kind, detail);
        }
        return DomainError::validation("Foreign key constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23514") || error_msg.contains("violates check constraint") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Check constraint violation");
        return DomainError::validation("Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

//! Error codes for the catalog API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Codes are SCREAMING_SNAKE_CASE and appear in logs next to every
//! error response.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Missing, malformed or badly signed bearer token, or unknown subject
    UnauthorizedInvalidJwt,
    /// Bearer token has expired
    UnauthorizedExpiredJwt,
    /// Authenticated, but not an admin
    InsufficientPermissions,
    /// Username/password pair did not match
    BadCredentials,

    // Request Validation
    /// One or more declared field rules failed
    ValidationError,
    /// Request body is not valid JSON
    InvalidJson,
    /// Query string could not be parsed
    InvalidQuery,

    // Resource Not Found
    GameNotFound,
    UserNotFound,
    RatingNotFound,
    /// No route for the requested path
    RouteNotFound,
    NotFound,

    // Conflicts
    RatingExists,
    UsernameTaken,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::BadCredentials => "BAD_CREDENTIALS",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidQuery => "INVALID_QUERY",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RatingNotFound => "RATING_NOT_FOUND",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RatingExists => "RATING_EXISTS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

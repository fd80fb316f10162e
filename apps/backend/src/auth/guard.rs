//! Authentication and authorization steps for descriptor chains.
//!
//! The two are separate steps so an endpoint can require a login without
//! requiring admin rights.

use actix_web::http::header;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::jwt::verify_access_token;
use crate::error::AppError;
use crate::pipeline::{Exchange, Step};

/// Parse `Authorization: Bearer <token>`.
fn bearer_token(value: Option<&header::HeaderValue>) -> Result<&str, AppError> {
    let raw = value
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::invalid_token)?;

    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::invalid_token()),
    }
}

/// Verify the bearer token and load its user into the exchange.
pub struct Authenticate;

#[async_trait(?Send)]
impl Step for Authenticate {
    async fn run(&self, ex: &mut Exchange) -> Result<(), AppError> {
        let token = bearer_token(ex.headers.get(header::AUTHORIZATION))?;
        let claims = verify_access_token(token, &ex.state.security)?;

        let user_id = claims.user_id().ok_or_else(|| {
            debug!(sub = %claims.sub, "token subject is not a user id");
            AppError::invalid_token()
        })?;

        match ex.state.users.find_by_id(user_id).await {
            Ok(Some(user)) => {
                ex.user = Some(user);
                Ok(())
            }
            Ok(None) => {
                debug!(user_id, "token subject no longer exists");
                Err(AppError::invalid_token())
            }
            Err(e) => {
                warn!(user_id, error = %e, "user lookup failed during authentication");
                Err(e.into())
            }
        }
    }
}

/// Require the authenticated user to be an admin. Runs after `Authenticate`.
pub struct RequireAdmin;

#[async_trait(?Send)]
impl Step for RequireAdmin {
    async fn run(&self, ex: &mut Exchange) -> Result<(), AppError> {
        match &ex.user {
            Some(user) if user.admin => Ok(()),
            _ => Err(AppError::insufficient_permissions()),
        }
    }
}

//! `POST /login` and `POST /register`.

use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::jwt::mint_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::DomainError;
use crate::pipeline::resolve::BAD_LOGIN;
use crate::pipeline::{Exchange, Field, Location, Resolve};
use crate::repos::{NewUser, User};
use crate::state::AppState;

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct Credentials {
    password: String,
}

#[derive(Deserialize)]
struct Registration {
    username: String,
    name: String,
    password: String,
}

pub fn login_fields() -> Vec<Field> {
    vec![
        Field::text(Location::Body, "username", 1, 30),
        Field::secret(Location::Body, "password", 1, 128),
    ]
}

pub fn register_fields() -> Vec<Field> {
    vec![
        Field::text(Location::Body, "username", 1, 30),
        Field::text(Location::Body, "name", 1, 30),
        Field::secret(Location::Body, "password", 6, 128),
    ]
}

fn username_key(ex: &Exchange) -> Option<String> {
    ex.validated
        .get("username")
        .and_then(Value::as_str)
        .map(String::from)
}

fn user_by_username(
    state: web::Data<AppState>,
    username: String,
) -> LocalBoxFuture<'static, Result<Option<User>, DomainError>> {
    async move { state.users.find_by_username(&username).await }.boxed_local()
}

/// Login resolves the user up front; an unknown name reads like a bad password.
pub fn username_exists() -> Resolve<String, User> {
    Resolve::present(Location::Body, "username", username_key, user_by_username)
        .with_message(BAD_LOGIN)
}

pub fn username_available() -> Resolve<String, User> {
    Resolve::absent(
        Location::Body,
        "username",
        username_key,
        user_by_username,
        "username already taken",
    )
}

fn token_response(user_id: i64, ex: &Exchange) -> Result<HttpResponse, AppError> {
    let token = mint_access_token(user_id, SystemTime::now(), &ex.state.security)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

pub fn post_login(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let user = ex.resolved_user()?;
        let input: Credentials = ex.validated_as()?;

        if !verify_password(&input.password, &user.password).await? {
            info!(user_id = user.id, "login rejected");
            return Err(AppError::bad_credentials());
        }

        token_response(user.id, &ex)
    }
    .boxed_local()
}

pub fn post_register(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let input: Registration = ex.validated_as()?;
        let password_hash = hash_password(&input.password).await?;

        let user = ex
            .state
            .users
            .insert(NewUser {
                username: input.username,
                name: input.name,
                password_hash,
            })
            .await?;
        info!(user_id = user.id, "user registered");

        token_response(user.id, &ex)
    }
    .boxed_local()
}

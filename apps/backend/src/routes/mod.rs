//! The endpoint descriptor table.

use actix_web::web;

use crate::auth::{Authenticate, RequireAdmin};
use crate::pipeline::{self, Endpoint, Method, MethodDescriptor};

pub mod auth;
pub mod games;
pub mod index;
pub mod ratings;

/// Every endpoint the service exposes, with its full chain per method.
pub fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new("/").method(MethodDescriptor::new(Method::Get, index::get_index)),
        Endpoint::new("/login").method(
            MethodDescriptor::new(Method::Post, auth::post_login)
                .validate_each(auth::login_fields())
                .validate(auth::username_exists()),
        ),
        Endpoint::new("/register").method(
            MethodDescriptor::new(Method::Post, auth::post_register)
                .validate_each(auth::register_fields())
                .validate(auth::username_available()),
        ),
        Endpoint::new("/games")
            .method(
                MethodDescriptor::new(Method::Get, games::get_games)
                    .validate_each(games::page_fields()),
            )
            .method(
                MethodDescriptor::new(Method::Post, games::post_game)
                    .authenticate(Authenticate)
                    .authenticate(RequireAdmin)
                    .validate_each(games::game_fields(false)),
            ),
        Endpoint::new("/games/{id}")
            .method(
                MethodDescriptor::new(Method::Get, games::get_game)
                    .validate(games::id_field())
                    .validate(games::game_exists()),
            )
            .method(
                MethodDescriptor::new(Method::Patch, games::patch_game)
                    .authenticate(Authenticate)
                    .authenticate(RequireAdmin)
                    .validate(games::id_field())
                    .validate(games::game_exists())
                    .validate_each(games::game_fields(true)),
            )
            .method(
                MethodDescriptor::new(Method::Delete, games::delete_game)
                    .authenticate(Authenticate)
                    .authenticate(RequireAdmin)
                    .validate(games::id_field())
                    .validate(games::game_exists()),
            ),
        Endpoint::new("/games/{id}/ratings")
            .method(
                MethodDescriptor::new(Method::Get, ratings::get_ratings)
                    .validate(games::id_field())
                    .validate(games::game_exists()),
            )
            .method(
                MethodDescriptor::new(Method::Post, ratings::post_rating)
                    .authenticate(Authenticate)
                    .validate(games::id_field())
                    .validate(games::game_exists())
                    .validate(ratings::rating_field())
                    .validate(ratings::not_yet_rated()),
            )
            .method(
                MethodDescriptor::new(Method::Patch, ratings::patch_rating)
                    .authenticate(Authenticate)
                    .validate(games::id_field())
                    .validate(games::game_exists())
                    .validate(ratings::rating_field())
                    .validate(ratings::already_rated()),
            ),
    ]
}

/// Register the descriptor table on an app or test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    pipeline::bind(cfg, endpoints());
}

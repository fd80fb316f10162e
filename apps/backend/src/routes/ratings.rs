//! `/games/{id}/ratings`.

use actix_web::{web, HttpResponse};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::errors::DomainError;
use crate::pipeline::{Exchange, Field, Location, Resolve};
use crate::repos::Rating;
use crate::state::AppState;

const RATINGS: &[i64] = &[0, 1, 2, 3, 4, 5];

#[derive(Deserialize)]
struct RatingInput {
    id: i64,
    rating: i32,
}

pub fn rating_field() -> Field {
    Field::one_of(Location::Body, "rating", RATINGS)
}

/// (user, game) of the current request, once both are known.
fn pair_key(ex: &Exchange) -> Option<(i64, i64)> {
    Some((ex.user.as_ref()?.id, ex.validated_i64("id")?))
}

fn rating_for(
    state: web::Data<AppState>,
    (user_id, game_id): (i64, i64),
) -> LocalBoxFuture<'static, Result<Option<Rating>, DomainError>> {
    async move { state.ratings.find(user_id, game_id).await }.boxed_local()
}

pub fn not_yet_rated() -> Resolve<(i64, i64), Rating> {
    Resolve::absent(
        Location::Params,
        "id",
        pair_key,
        rating_for,
        "You have already rated this game",
    )
}

pub fn already_rated() -> Resolve<(i64, i64), Rating> {
    Resolve::present(Location::Params, "id", pair_key, rating_for)
        .with_message("You have not rated this game")
}

fn submitted(ex: &Exchange) -> Result<Rating, AppError> {
    let input: RatingInput = ex.validated_as()?;
    Ok(Rating {
        user_id: ex.current_user()?.id,
        game_id: input.id,
        rating: input.rating,
    })
}

pub fn get_ratings(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let game_id = ex.game()?.id;
        let ratings = ex.state.ratings.list_for_game(game_id).await?;
        Ok(HttpResponse::Ok().json(ratings))
    }
    .boxed_local()
}

pub fn post_rating(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let rating = ex.state.ratings.insert(submitted(&ex)?).await?;
        info!(user_id = rating.user_id, game_id = rating.game_id, "game rated");
        Ok(HttpResponse::Created().json(rating))
    }
    .boxed_local()
}

pub fn patch_rating(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let rating = ex.state.ratings.update(submitted(&ex)?).await?;
        Ok(HttpResponse::Ok().json(rating))
    }
    .boxed_local()
}

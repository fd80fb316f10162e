//! `/games` and `/games/{id}`.

use actix_web::{web, HttpResponse};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::errors::DomainError;
use crate::pipeline::{Exchange, Field, Location, Resolve};
use crate::repos::{Game, NewGame};
use crate::state::AppState;

const FIRST_YEAR: i64 = 1970;
/// Keeps years inside the `INT` column and the `i32` model field.
const LAST_YEAR: i64 = 9999;

/// Partial update input; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
struct GamePatch {
    name: Option<String>,
    category: Option<String>,
    description: Option<String>,
    studio: Option<String>,
    year: Option<i32>,
    image: Option<String>,
}

impl GamePatch {
    fn apply(self, current: &Game) -> Game {
        Game {
            id: current.id,
            name: self.name.unwrap_or_else(|| current.name.clone()),
            category: self.category.unwrap_or_else(|| current.category.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            studio: self.studio.unwrap_or_else(|| current.studio.clone()),
            year: self.year.unwrap_or(current.year),
            image: self.image.or_else(|| current.image.clone()),
        }
    }
}

/// Rules for game fields. On patch every field becomes optional.
pub fn game_fields(optional: bool) -> Vec<Field> {
    let required = vec![
        Field::text(Location::Body, "name", 1, 30),
        Field::text(Location::Body, "category", 1, 10),
        Field::text(Location::Body, "description", 0, 2048),
        Field::text(Location::Body, "studio", 1, 30),
        Field::integer(Location::Body, "year", Some(FIRST_YEAR), Some(LAST_YEAR)),
    ];
    let mut fields: Vec<Field> = if optional {
        required.into_iter().map(Field::optional).collect()
    } else {
        required
    };
    fields.push(Field::text(Location::Body, "image", 1, 255).optional());
    fields
}

pub fn page_fields() -> Vec<Field> {
    vec![
        Field::integer(Location::Query, "limit", None, None).optional(),
        Field::integer(Location::Query, "offset", Some(0), None)
            .optional()
            .with_message("offset must be an integer of at least 0"),
    ]
}

pub fn id_field() -> Field {
    Field::integer(Location::Params, "id", Some(1), None)
        .with_message("id must be an integer larger than 0")
}

fn id_key(ex: &Exchange) -> Option<i64> {
    ex.validated_i64("id")
}

fn game_by_id(
    state: web::Data<AppState>,
    id: i64,
) -> LocalBoxFuture<'static, Result<Option<Game>, DomainError>> {
    async move { state.games.find_by_id(id).await }.boxed_local()
}

pub fn game_exists() -> Resolve<i64, Game> {
    Resolve::present(Location::Params, "id", id_key, game_by_id)
}

pub fn get_games(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let games = ex
            .state
            .games
            .list(ex.validated_i64("offset"), ex.validated_i64("limit"))
            .await?;
        Ok(HttpResponse::Ok().json(games))
    }
    .boxed_local()
}

pub fn post_game(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let input: NewGame = ex.validated_as()?;
        let game = ex.state.games.insert(input).await?;
        info!(game_id = game.id, "game created");
        Ok(HttpResponse::Created().json(game))
    }
    .boxed_local()
}

pub fn get_game(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move { Ok(HttpResponse::Ok().json(ex.game()?)) }.boxed_local()
}

pub fn patch_game(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let patch: GamePatch = ex.validated_as()?;
        let updated = patch.apply(ex.game()?);
        let game = ex.state.games.update(updated).await?;
        Ok(HttpResponse::Ok().json(game))
    }
    .boxed_local()
}

pub fn delete_game(ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async move {
        let id = ex.game()?.id;
        ex.state.games.delete(id).await?;
        info!(game_id = id, "game deleted");
        Ok(HttpResponse::NoContent().finish())
    }
    .boxed_local()
}

//! Game repository.

use std::sync::Arc;

use sea_orm::{QueryResult, Value};
use serde::{Deserialize, Serialize};

use super::column;
use crate::db::Gateway;
use crate::errors::domain::{DomainError, NotFoundKind};

const COLUMNS: &str = "id, name, category, description, studio, year, image";

/// Game domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub studio: String,
    pub year: i32,
    pub image: Option<String>,
}

/// Fields of a game that does not have an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewGame {
    pub name: String,
    pub category: String,
    pub description: String,
    pub studio: String,
    pub year: i32,
    #[serde(default)]
    pub image: Option<String>,
}

impl TryFrom<&QueryResult> for Game {
    type Error = DomainError;

    fn try_from(row: &QueryResult) -> Result<Self, Self::Error> {
        Ok(Self {
            id: column(row, "id")?,
            name: column(row, "name")?,
            category: column(row, "category")?,
            description: column(row, "description")?,
            studio: column(row, "studio")?,
            year: column(row, "year")?,
            image: column(row, "image")?,
        })
    }
}

pub struct GameRepo {
    gateway: Arc<Gateway>,
}

impl GameRepo {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Game>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM games WHERE id = $1");
        let rows = self.gateway.execute(&sql, vec![id.into()]).await?;
        rows.into_optional().as_ref().map(Game::try_from).transpose()
    }

    /// One page of games ordered by id. The gateway clamps the window.
    pub async fn list(
        &self,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Game>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM games ORDER BY id ASC");
        let rows = self
            .gateway
            .execute_paged(&sql, offset, limit, vec![])
            .await?;
        rows.into_rows().iter().map(Game::try_from).collect()
    }

    pub async fn insert(&self, game: NewGame) -> Result<Game, DomainError> {
        let sql = format!(
            "INSERT INTO games (name, category, description, studio, year, image) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        let params: Vec<Value> = vec![
            game.name.into(),
            game.category.into(),
            game.description.into(),
            game.studio.into(),
            game.year.into(),
            game.image.into(),
        ];
        let row = self
            .gateway
            .execute(&sql, params)
            .await?
            .into_single(NotFoundKind::Game)?;
        Game::try_from(&row)
    }

    /// Overwrite every mutable column of `game.id`.
    pub async fn update(&self, game: Game) -> Result<Game, DomainError> {
        let sql = format!(
            "UPDATE games SET name = $2, category = $3, description = $4, studio = $5, \
             year = $6, image = $7 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let params: Vec<Value> = vec![
            game.id.into(),
            game.name.into(),
            game.category.into(),
            game.description.into(),
            game.studio.into(),
            game.year.into(),
            game.image.into(),
        ];
        let row = self
            .gateway
            .execute(&sql, params)
            .await?
            .into_single(NotFoundKind::Game)?;
        Game::try_from(&row)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.gateway
            .execute("DELETE FROM games WHERE id = $1 RETURNING id", vec![id.into()])
            .await?
            .into_single(NotFoundKind::Game)?;
        Ok(())
    }
}

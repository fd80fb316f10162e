//! Rating repository. One row per (user, game).

use std::sync::Arc;

use sea_orm::QueryResult;
use serde::Serialize;

use super::column;
use crate::db::Gateway;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub user_id: i64,
    pub game_id: i64,
    pub rating: i32,
}

impl TryFrom<&QueryResult> for Rating {
    type Error = DomainError;

    fn try_from(row: &QueryResult) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: column(row, "user_id")?,
            game_id: column(row, "game_id")?,
            rating: column(row, "rating")?,
        })
    }
}

pub struct RatingRepo {
    gateway: Arc<Gateway>,
}

impl RatingRepo {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn find(&self, user_id: i64, game_id: i64) -> Result<Option<Rating>, DomainError> {
        let rows = self
            .gateway
            .execute(
                "SELECT user_id, game_id, rating FROM ratings WHERE user_id = $1 AND game_id = $2",
                vec![user_id.into(), game_id.into()],
            )
            .await?;
        rows.into_optional().as_ref().map(Rating::try_from).transpose()
    }

    pub async fn list_for_game(&self, game_id: i64) -> Result<Vec<Rating>, DomainError> {
        let rows = self
            .gateway
            .execute(
                "SELECT user_id, game_id, rating FROM ratings WHERE game_id = $1 ORDER BY user_id ASC",
                vec![game_id.into()],
            )
            .await?;
        rows.into_rows().iter().map(Rating::try_from).collect()
    }

    /// Insert a rating. The composite key rejects a second rating for the
    /// same pair with `Conflict(RatingExists)`.
    pub async fn insert(&self, rating: Rating) -> Result<Rating, DomainError> {
        let row = self
            .gateway
            .execute(
                "INSERT INTO ratings (user_id, game_id, rating) VALUES ($1, $2, $3) \
                 RETURNING user_id, game_id, rating",
                vec![
                    rating.user_id.into(),
                    rating.game_id.into(),
                    rating.rating.into(),
                ],
            )
            .await?
            .into_single(NotFoundKind::Rating)?;
        Rating::try_from(&row)
    }

    pub async fn update(&self, rating: Rating) -> Result<Rating, DomainError> {
        let row = self
            .gateway
            .execute(
                "UPDATE ratings SET rating = $3 WHERE user_id = $1 AND game_id = $2 \
                 RETURNING user_id, game_id, rating",
                vec![
                    rating.user_id.into(),
                    rating.game_id.into(),
                    rating.rating.into(),
                ],
            )
            .await?
            .into_single(NotFoundKind::Rating)?;
        Rating::try_from(&row)
    }
}

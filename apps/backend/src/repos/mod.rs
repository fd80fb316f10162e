//! Repositories: typed entities over the persistence gateway.

pub mod games;
pub mod ratings;
pub mod users;

use sea_orm::{QueryResult, TryGetable};

use crate::errors::domain::{DomainError, InfraErrorKind};

pub use games::{Game, GameRepo, NewGame};
pub use ratings::{Rating, RatingRepo};
pub use users::{NewUser, User, UserRepo};

/// Read one declared column; a missing or mistyped column means the row is not a valid entity.
pub(crate) fn column<T: TryGetable>(row: &QueryResult, name: &str) -> Result<T, DomainError> {
    row.try_get::<T>("", name).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("column `{name}` unreadable: {e}"),
        )
    })
}

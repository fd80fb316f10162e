//! User repository.

use std::sync::Arc;

use sea_orm::QueryResult;

use super::column;
use crate::db::Gateway;
use crate::errors::domain::{DomainError, NotFoundKind};

const COLUMNS: &str = "id, username, name, password, admin";

/// User domain model. `password` is the stored argon2 PHC string and is
/// never sent to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub password: String,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

impl TryFrom<&QueryResult> for User {
    type Error = DomainError;

    fn try_from(row: &QueryResult) -> Result<Self, Self::Error> {
        Ok(Self {
            id: column(row, "id")?,
            username: column(row, "username")?,
            name: column(row, "name")?,
            password: column(row, "password")?,
            admin: column(row, "admin")?,
        })
    }
}

pub struct UserRepo {
    gateway: Arc<Gateway>,
}

impl UserRepo {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let rows = self.gateway.execute(&sql, vec![id.into()]).await?;
        rows.into_optional().as_ref().map(User::try_from).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        let rows = self.gateway.execute(&sql, vec![username.into()]).await?;
        rows.into_optional().as_ref().map(User::try_from).transpose()
    }

    /// Insert a non-admin user. A taken username surfaces as
    /// `Conflict(UniqueUsername)` from the unique index.
    pub async fn insert(&self, user: NewUser) -> Result<User, DomainError> {
        let sql = format!(
            "INSERT INTO users (username, name, password) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let row = self
            .gateway
            .execute(
                &sql,
                vec![
                    user.username.into(),
                    user.name.into(),
                    user.password_hash.into(),
                ],
            )
            .await?
            .into_single(NotFoundKind::User)?;
        User::try_from(&row)
    }
}

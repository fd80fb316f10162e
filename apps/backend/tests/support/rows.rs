//! Mock database rows shaped like the catalog tables.

use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, MockDatabase, Value};

pub type Row = BTreeMap<&'static str, Value>;

pub fn db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// The result of a query that matched nothing.
pub fn none() -> Vec<Row> {
    Vec::new()
}

pub fn game(id: i64, name: &str, year: i32) -> Row {
    BTreeMap::from([
        ("id", id.into()),
        ("name", name.into()),
        ("category", "rpg".into()),
        ("description", "A game".into()),
        ("studio", "Studio".into()),
        ("year", year.into()),
        ("image", Value::String(None)),
    ])
}

pub fn user(id: i64, username: &str, admin: bool) -> Row {
    user_with_hash(id, username, admin, "$argon2id$v=19$m=19456,t=2,p=1$unused")
}

pub fn user_with_hash(id: i64, username: &str, admin: bool, hash: &str) -> Row {
    BTreeMap::from([
        ("id", id.into()),
        ("username", username.into()),
        ("name", "Name".into()),
        ("password", hash.into()),
        ("admin", admin.into()),
    ])
}

pub fn admin(id: i64) -> Row {
    user(id, "admin", true)
}

pub fn rating(user_id: i64, game_id: i64, rating: i32) -> Row {
    BTreeMap::from([
        ("user_id", user_id.into()),
        ("game_id", game_id.into()),
        ("rating", rating.into()),
    ])
}

pub fn deleted_id(id: i64) -> Row {
    BTreeMap::from([("id", id.into())])
}

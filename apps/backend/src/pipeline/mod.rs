//! Request pipeline: exchange, field rules, resolvers, aggregated check,
//! and the descriptor dispatcher.

pub mod check;
pub mod dispatch;
pub mod exchange;
pub mod fields;
pub mod resolve;

pub use check::{check_validation, status_for};
pub use dispatch::{bind, Endpoint, Handler, Method, MethodDescriptor, Step};
pub use exchange::{Exchange, FieldError, Location, Resource};
pub use fields::Field;
pub use resolve::{resolve, Expect, Resolution, Resolve};

#[cfg(test)]
pub(crate) fn test_state_with(db: sea_orm::MockDatabase) -> actix_web::web::Data<crate::AppState> {
    use std::sync::Arc;

    let gateway = Arc::new(crate::db::Gateway::from_connection(db.into_connection()));
    actix_web::web::Data::new(crate::AppState::new(
        gateway,
        crate::SecurityConfig::default(),
    ))
}

#[cfg(test)]
pub(crate) fn test_state() -> actix_web::web::Data<crate::AppState> {
    test_state_with(sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres))
}

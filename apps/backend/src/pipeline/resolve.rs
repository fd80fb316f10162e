//! Resource resolution: an async existence check that attaches what it finds.

use std::future::Future;

use actix_web::web;
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use super::dispatch::Step;
use super::exchange::{Exchange, Location, Resource};
use crate::error::AppError;
use crate::errors::DomainError;
use crate::state::AppState;

pub const NOT_FOUND: &str = "not found";
pub const SERVER_ERROR: &str = "server error";
pub const BAD_LOGIN: &str = "username or password incorrect";

/// Outcome of one lookup.
#[derive(Debug)]
pub enum Resolution<T> {
    Found(T),
    Missing,
    Failed(DomainError),
}

pub async fn resolve<K, T, F, Fut>(lookup: F, key: K) -> Resolution<T>
where
    F: FnOnce(K) -> Fut,
    Fut: Future<Output = Result<Option<T>, DomainError>>,
{
    match lookup(key).await {
        Ok(Some(entity)) => Resolution::Found(entity),
        Ok(None) => Resolution::Missing,
        Err(e) => Resolution::Failed(e),
    }
}

/// Whether the request needs the entity to exist or to be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Present,
    Absent,
}

pub type Lookup<K, T> =
    fn(web::Data<AppState>, K) -> LocalBoxFuture<'static, Result<Option<T>, DomainError>>;

/// Validation step resolving one field to an entity.
///
/// Skipped when the field already failed a rule, so lookups only ever see
/// keys that passed their shape checks.
pub struct Resolve<K, T> {
    location: Location,
    field: &'static str,
    key: fn(&Exchange) -> Option<K>,
    lookup: Lookup<K, T>,
    expect: Expect,
    message: &'static str,
}

impl<K, T> Resolve<K, T> {
    /// The entity must exist; it is attached as the request's resource.
    pub fn present(
        location: Location,
        field: &'static str,
        key: fn(&Exchange) -> Option<K>,
        lookup: Lookup<K, T>,
    ) -> Self {
        Self {
            location,
            field,
            key,
            lookup,
            expect: Expect::Present,
            message: NOT_FOUND,
        }
    }

    /// The entity must not exist yet; `message` is reported when it does.
    pub fn absent(
        location: Location,
        field: &'static str,
        key: fn(&Exchange) -> Option<K>,
        lookup: Lookup<K, T>,
        message: &'static str,
    ) -> Self {
        Self {
            location,
            field,
            key,
            lookup,
            expect: Expect::Absent,
            message,
        }
    }

    /// Replace the failure message (e.g. a login never says `not found`).
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }
}

#[async_trait(?Send)]
impl<K, T> Step for Resolve<K, T>
where
    K: 'static,
    T: Into<Resource> + 'static,
{
    async fn run(&self, ex: &mut Exchange) -> Result<(), AppError> {
        if ex.has_error(self.location, self.field) {
            return Ok(());
        }
        let Some(key) = (self.key)(ex) else {
            return Ok(());
        };

        let state = ex.state.clone();
        let lookup = self.lookup;
        let outcome = resolve(|k| lookup(state, k), key).await;

        match (outcome, self.expect) {
            (Resolution::Found(entity), Expect::Present) => ex.resource = entity.into(),
            (Resolution::Missing, Expect::Absent) => {}
            (Resolution::Missing, Expect::Present) | (Resolution::Found(_), Expect::Absent) => {
                let value = ex.raw(self.location, self.field);
                ex.fail(self.location, self.field, value, self.message);
            }
            (Resolution::Failed(e), _) => {
                warn!(field = self.field, error = %e, "resource lookup failed");
                ex.fail(self.location, self.field, None, SERVER_ERROR);
            }
        }
        Ok(())
    }
}

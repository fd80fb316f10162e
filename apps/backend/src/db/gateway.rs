//! Persistence gateway: the single owner of the PostgreSQL pool.
//!
//! Every query in the service goes through [`Gateway::execute`] or
//! [`Gateway::execute_paged`]. Parameters are always bound positionally
//! (`$1..$n`); SQL text never carries user input.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, QueryResult,
    Statement, Value,
};
use tracing::{debug, info, warn};

use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::infra::db_errors::{is_fatal, map_db_err};

/// Hard cap on rows returned by a paged query.
pub const MAX_PAGE_SIZE: i64 = 10;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Rows returned by one statement. Mutations use `RETURNING`, so `len()`
/// doubles as the affected-row count.
#[derive(Debug, Default)]
pub struct RowSet {
    rows: Vec<QueryResult>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<QueryResult> {
        self.rows
    }

    /// First row of a keyed lookup, if any.
    pub fn into_optional(self) -> Option<QueryResult> {
        self.rows.into_iter().next()
    }

    /// Enforce "exactly one row affected" for keyed writes.
    pub fn into_single(self, missing: NotFoundKind) -> Result<QueryResult, DomainError> {
        let count = self.rows.len();
        let mut rows = self.rows.into_iter();
        match (rows.next(), count) {
            (Some(row), 1) => Ok(row),
            (None, _) => Err(DomainError::not_found(missing, "not found")),
            (Some(_), n) => Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("expected one affected row, got {n}"),
            )),
        }
    }
}

/// Clamp a requested window to `(offset, limit)`.
///
/// Missing or non-positive limits become [`MAX_PAGE_SIZE`], larger ones are
/// capped to it. Negative offsets become zero.
pub fn page_window(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let limit = match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_SIZE),
        _ => MAX_PAGE_SIZE,
    };
    let offset = offset.unwrap_or(0).max(0);
    (offset, limit)
}

pub struct Gateway {
    url: Option<String>,
    max_connections: u32,
    conn: RwLock<Option<Arc<DatabaseConnection>>>,
}

impl Gateway {
    /// An unopened gateway for `url`. Nothing connects until [`Gateway::open`].
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            url: Some(url.into()),
            max_connections,
            conn: RwLock::new(None),
        }
    }

    /// Wrap an already established connection (e.g. a sea-orm `MockDatabase`).
    /// Such a gateway cannot be re-opened once closed.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self {
            url: None,
            max_connections: 0,
            conn: RwLock::new(Some(Arc::new(conn))),
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.read().is_some()
    }

    pub async fn open(&self) -> Result<(), DomainError> {
        if self.is_open() {
            return Ok(());
        }
        let Some(url) = self.url.as_deref() else {
            return Err(DomainError::infra(
                InfraErrorKind::DbUnavailable,
                "no database url configured",
            ));
        };

        let mut opts = ConnectOptions::new(url.to_owned());
        opts.max_connections(self.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .sqlx_logging(false);

        let conn = Database::connect(opts).await.map_err(map_db_err)?;

        let raced = {
            let mut slot = self.conn.write();
            if slot.is_some() {
                Some(conn)
            } else {
                *slot = Some(Arc::new(conn));
                None
            }
        };
        match raced {
            Some(extra) => {
                debug!("gateway opened concurrently; dropping extra pool");
                if let Err(e) = extra.close().await {
                    warn!(error = %e, "failed to close extra pool");
                }
            }
            None => info!(max_connections = self.max_connections, "database pool opened"),
        }
        Ok(())
    }

    /// Close the pool. Returns `false` when nothing was open.
    pub async fn close(&self) -> bool {
        let taken = self.conn.write().take();
        match taken {
            Some(conn) => {
                release(conn).await;
                info!("database pool closed");
                true
            }
            None => {
                warn!("close called on a gateway that is not open");
                false
            }
        }
    }

    /// Current connection handle, for startup migrations.
    pub fn connection(&self) -> Result<Arc<DatabaseConnection>, DomainError> {
        self.conn.read().clone().ok_or_else(|| {
            DomainError::infra(InfraErrorKind::DbUnavailable, "database is not open")
        })
    }

    /// Take the connection out, leaving the gateway closed without closing
    /// the pool. Fails, and leaves the gateway open, while another caller
    /// still holds the handle.
    pub fn detach(&self) -> Result<DatabaseConnection, DomainError> {
        let mut slot = self.conn.write();
        let conn = slot.take().ok_or_else(|| {
            DomainError::infra(InfraErrorKind::DbUnavailable, "database is not open")
        })?;
        Arc::try_unwrap(conn).map_err(|shared| {
            *slot = Some(shared);
            DomainError::infra(InfraErrorKind::DbUnavailable, "connection is still in use")
        })
    }

    pub async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<RowSet, DomainError> {
        let conn = self.connection()?;
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, params);

        match conn.query_all(stmt).await {
            Ok(rows) => Ok(RowSet { rows }),
            Err(e) => {
                warn!(error = %e, sql, "query failed");
                if is_fatal(&e) {
                    drop(conn);
                    self.shut_down().await;
                }
                Err(map_db_err(e))
            }
        }
    }

    /// Like [`Gateway::execute`] with `LIMIT`/`OFFSET` appended as bound parameters.
    pub async fn execute_paged(
        &self,
        sql: &str,
        offset: Option<i64>,
        limit: Option<i64>,
        mut params: Vec<Value>,
    ) -> Result<RowSet, DomainError> {
        let (offset, limit) = page_window(offset, limit);
        let n = params.len();
        let sql = format!("{sql} LIMIT ${} OFFSET ${}", n + 1, n + 2);
        params.push(limit.into());
        params.push(offset.into());
        self.execute(&sql, params).await
    }

    async fn shut_down(&self) {
        let taken = self.conn.write().take();
        if let Some(conn) = taken {
            warn!("fatal database error; gateway shut down until reopened");
            release(conn).await;
        }
    }
}

async fn release(conn: Arc<DatabaseConnection>) {
    // In-flight calls may still hold a clone; the pool goes away with the last one.
    if let Ok(conn) = Arc::try_unwrap(conn) {
        if let Err(e) = conn.close().await {
            warn!(error = %e, "error while closing database pool");
        }
    }
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::db::Gateway;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

enum DbSource {
    Url { url: String, max_connections: u32 },
    Gateway(Arc<Gateway>),
}

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db: Option<DbSource>,
    migrate: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            db: None,
            migrate: true,
        }
    }

    /// Connect to PostgreSQL at `url` when built.
    pub fn with_database_url(mut self, url: impl Into<String>, max_connections: u32) -> Self {
        self.db = Some(DbSource::Url {
            url: url.into(),
            max_connections,
        });
        self
    }

    /// Use an existing connection, e.g. a sea-orm `MockDatabase`. Never migrated.
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.db = Some(DbSource::Gateway(Arc::new(Gateway::from_connection(conn))));
        self.migrate = false;
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    /// Open the gateway and, for real databases, apply pending migrations.
    pub async fn build(self) -> Result<AppState, AppError> {
        let gateway = match self.db {
            Some(DbSource::Url {
                url,
                max_connections,
            }) => Arc::new(Gateway::new(url, max_connections)),
            Some(DbSource::Gateway(gateway)) => gateway,
            None => return Err(AppError::config("no database configured for AppState")),
        };

        gateway.open().await?;

        if self.migrate {
            let conn = gateway.connection()?;
            migration::migrate(&conn, migration::MigrationCommand::Up)
                .await
                .map_err(|e| AppError::internal(format!("migrations failed: {e}")))?;
            info!("database migrations applied");
        }

        Ok(AppState::new(gateway, self.security_config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

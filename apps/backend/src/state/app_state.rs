use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::db::Gateway;
use crate::repos::{GameRepo, RatingRepo, UserRepo};

/// Application state shared by every worker through `web::Data`.
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub games: GameRepo,
    pub users: UserRepo,
    pub ratings: RatingRepo,
    pub security: SecurityConfig,
}

impl AppState {
    /// Wire the repositories onto one shared gateway.
    pub fn new(gateway: Arc<Gateway>, security: SecurityConfig) -> Self {
        Self {
            games: GameRepo::new(Arc::clone(&gateway)),
            users: UserRepo::new(Arc::clone(&gateway)),
            ratings: RatingRepo::new(Arc::clone(&gateway)),
            gateway,
            security,
        }
    }
}

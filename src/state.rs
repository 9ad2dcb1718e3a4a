use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;

/// Process-wide configuration and the database handle, established once at
/// startup and read-only thereafter.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
}

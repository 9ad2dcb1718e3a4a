use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

pub mod models;
pub mod posts;
pub mod profiles;
pub mod users;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate value for {0}")]
    UniqueViolation(&'static str),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the connection pool without touching the network; connections are
/// established on first use.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_lazy(&config.url)?;

    info!("created database pool (max_connections={})", config.max_connections);
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("database migrations applied");
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Map a unique-index violation (PG 23505) onto the field it guards, so the
/// API layer can answer Conflict instead of a generic error.
pub(crate) fn translate(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            let field = match db_err.constraint() {
                Some("users_email_key") => "email",
                Some("profiles_handle_key") => "handle",
                Some("profiles_user_id_key") => "profile",
                _ => "value",
            };
            return DbError::UniqueViolation(field);
        }
    }
    DbError::Sqlx(err)
}

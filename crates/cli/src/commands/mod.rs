//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::PgPool;
use thiserror::Error;

use taskboard_api::config::{self, ConfigError};
use taskboard_api::db::RepositoryError;
use taskboard_api::services::ServiceError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A repository call failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// A use case failed.
    #[error("{0}")]
    Service(#[from] ServiceError),
}

/// Connect to the database named by `TASKBOARD_DATABASE_URL` (or `DATABASE_URL`).
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = config::get_database_url("TASKBOARD_DATABASE_URL")?;

    tracing::info!("Connecting to database...");
    Ok(taskboard_api::db::create_pool(&database_url).await?)
}

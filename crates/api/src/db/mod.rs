//! Persistence for the task board.
//!
//! # Database: `taskboard`
//!
//! All tables live in the `board` schema:
//!
//! - `users` - Owners referenced by projects and lists
//! - `projects` - Project boards
//! - `lists` - Board columns, with cards embedded as a JSONB array
//!
//! # Backends
//!
//! Every entity is accessed through an async repository trait with two
//! implementations: `PostgreSQL` (the default) and an in-process
//! [`MemoryStore`] used by tests and `TASKBOARD_STORAGE=memory`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p taskboard-cli -- migrate
//! ```

pub mod lists;
pub mod memory;
pub mod projects;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use taskboard_core::{ListId, ProjectId, UserId};

use crate::models::{Cursor, List, ListFilter, NewList, NewUser, Project, ProjectFilter, User};

pub use lists::PgListRepository;
pub use memory::MemoryStore;
pub use projects::PgProjectRepository;
pub use users::PgUserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Storage for lists.
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Insert a list; the store assigns the ID and timestamps.
    async fn insert(&self, list: NewList) -> Result<List, RepositoryError>;

    /// Insert several lists atomically, preserving input order.
    async fn insert_many(&self, lists: Vec<NewList>) -> Result<Vec<List>, RepositoryError>;

    async fn find_by_id(&self, id: ListId) -> Result<Option<List>, RepositoryError>;

    /// One page of lists matching `filter`, ordered by `cursor`.
    async fn find(&self, filter: ListFilter, cursor: &Cursor)
    -> Result<Vec<List>, RepositoryError>;

    /// Total number of lists matching `filter`, ignoring pagination.
    async fn count(&self, filter: ListFilter) -> Result<i64, RepositoryError>;

    /// Persist every field of `list` and bump `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` if the list no longer exists.
    async fn save(&self, list: &List) -> Result<List, RepositoryError>;

    /// Delete the list only if it belongs to `user_id`. Returns the number removed.
    async fn delete_owned(&self, id: ListId, user_id: UserId) -> Result<u64, RepositoryError>;
}

/// Storage for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, title: Option<String>, user_id: UserId)
    -> Result<Project, RepositoryError>;

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;

    async fn find(
        &self,
        filter: ProjectFilter,
        cursor: &Cursor,
    ) -> Result<Vec<Project>, RepositoryError>;

    async fn count(&self, filter: ProjectFilter) -> Result<i64, RepositoryError>;

    async fn save(&self, project: &Project) -> Result<Project, RepositoryError>;

    async fn delete_owned(&self, id: ProjectId, user_id: UserId)
    -> Result<u64, RepositoryError>;
}

/// Storage for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
}

/// The repositories the service layer runs against.
#[derive(Clone)]
pub struct Storage {
    pub lists: Arc<dyn ListRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub users: Arc<dyn UserRepository>,
    pool: Option<PgPool>,
}

impl Storage {
    /// `PostgreSQL`-backed storage sharing one pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            lists: Arc::new(PgListRepository::new(pool.clone())),
            projects: Arc::new(PgProjectRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Fresh, empty in-memory storage.
    #[must_use]
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            lists: store.clone(),
            projects: store.clone(),
            users: store,
            pool: None,
        }
    }

    /// The underlying pool, if backed by `PostgreSQL`.
    #[must_use]
    pub const fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database does not answer.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field(
                "backend",
                &if self.pool.is_some() {
                    "postgres"
                } else {
                    "memory"
                },
            )
            .finish_non_exhaustive()
    }
}

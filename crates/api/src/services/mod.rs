//! Use cases for the task board.
//!
//! Each use case is a free function over [`Storage`](crate::db::Storage) that
//! awaits its repository calls in sequence and reports failures as a
//! [`ServiceError`].
//!
//! - [`lists`] - Create, card append, listing, edit and delete of lists
//! - [`projects`] - Project use cases, including seeding on creation
//! - [`seed`] - Default board columns for new projects

pub mod lists;
pub mod projects;
pub mod seed;

use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::QueryError;

pub use seed::{SeedOutcome, SeedScope};

/// Errors that can occur in a use case.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request is malformed.
    #[error("{0}")]
    ValidationFailed(String),

    /// The store rejected or failed the operation.
    #[error("store failure")]
    StoreFailure(#[source] RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Not found".to_string()),
            other => Self::StoreFailure(other),
        }
    }
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        Self::ValidationFailed(err.to_string())
    }
}

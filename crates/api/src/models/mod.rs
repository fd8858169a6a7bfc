//! Domain models for the task board.
//!
//! - [`list`] - Lists (board columns) and their embedded cards
//! - [`project`] - Projects (boards)
//! - [`user`] - Users, referenced by ID only
//! - [`query`] - Query descriptors for the listing endpoints

pub mod list;
pub mod project;
pub mod query;
pub mod user;

use serde::{Deserialize, Deserializer, Serialize};

pub use list::{
    Card, CreateCardInput, CreateListInput, DeleteListInput, List, ListFilter, NewList,
    UpdateListInput,
};
pub use project::{
    CreateProjectInput, DeleteProjectInput, Project, ProjectFilter, UpdateProjectInput,
};
pub use query::{
    Cursor, ListsQuery, Projected, ProjectsQuery, QueryDescriptor, QueryError, Select,
};
pub use user::{NewUser, User};

/// Deserialize an update field where `null` differs from absent.
///
/// Use with `#[serde(default)]`: an absent field stays `None` and an explicit
/// `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Acknowledgment returned by ownership-checked deletes.
///
/// A zero count means nothing matched both the ID and the owner; that is not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub deleted_count: u64,
}

//! Default board columns for new projects.
//!
//! The template is embedded at compile time. Seeding is guarded by a count of
//! existing lists; [`SeedScope`] decides which lists that count covers.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use taskboard_core::{ProjectId, UserId};

use super::ServiceError;
use crate::db::{RepositoryError, Storage};
use crate::models::{Card, List, ListFilter, NewList};

const TEMPLATE: &str = include_str!("seed_lists.json");

/// Which existing lists prevent seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedScope {
    /// Any list in the store. Only the first project ever created is seeded.
    #[default]
    Global,
    /// Lists of the new project. Every new project is seeded.
    Project,
}

impl SeedScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for SeedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`SeedScope`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown seed scope '{0}' (expected 'global' or 'project')")]
pub struct ParseSeedScopeError(String);

impl FromStr for SeedScope {
    type Err = ParseSeedScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "project" => Ok(Self::Project),
            other => Err(ParseSeedScopeError(other.to_string())),
        }
    }
}

/// Result of a seed run.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    /// Lists already existed in scope; nothing was inserted.
    Skipped { existing: i64 },
    /// The template was inserted.
    Seeded(Vec<List>),
}

impl SeedOutcome {
    /// Number of lists inserted by this run.
    #[must_use]
    pub fn inserted(&self) -> usize {
        match self {
            Self::Skipped { .. } => 0,
            Self::Seeded(lists) => lists.len(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateList {
    title: String,
    #[serde(default)]
    has_create: bool,
    #[serde(default)]
    cards: Vec<Card>,
}

/// The default lists, stamped with their owner and project.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the embedded template is not valid.
pub fn template(user_id: UserId, project_id: ProjectId) -> Result<Vec<NewList>, RepositoryError> {
    let lists: Vec<TemplateList> = serde_json::from_str(TEMPLATE)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid seed template: {e}")))?;

    Ok(lists
        .into_iter()
        .map(|list| NewList {
            title: Some(list.title),
            has_create: list.has_create,
            cards: list.cards,
            user_id,
            project_id,
        })
        .collect())
}

/// Insert the default lists unless lists already exist in `scope`.
///
/// # Errors
///
/// Returns `ServiceError::StoreFailure` if counting or inserting fails.
#[instrument(skip(storage))]
pub async fn seed_lists(
    storage: &Storage,
    scope: SeedScope,
    user_id: UserId,
    project_id: ProjectId,
) -> Result<SeedOutcome, ServiceError> {
    let filter = match scope {
        SeedScope::Global => ListFilter::default(),
        SeedScope::Project => ListFilter::for_project(project_id),
    };

    let existing = storage.lists.count(filter).await?;
    if existing > 0 {
        tracing::debug!(existing, "Lists already present, skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let lists = storage
        .lists
        .insert_many(template(user_id, project_id)?)
        .await?;
    tracing::info!(count = lists.len(), "Seeded default lists");

    Ok(SeedOutcome::Seeded(lists))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_template_columns() {
        let lists = template(UserId::new(1), ProjectId::new(2)).unwrap();
        let titles: Vec<_> = lists.iter().filter_map(|l| l.title.as_deref()).collect();

        assert_eq!(
            titles,
            vec!["Novo", "Em andamento", "Validação (QA)", "Finalizado"]
        );
        assert!(lists[0].has_create);
        assert!(lists[1..].iter().all(|l| !l.has_create));
        assert!(lists.iter().all(|l| l.cards.is_empty()));
        assert!(
            lists
                .iter()
                .all(|l| l.user_id == UserId::new(1) && l.project_id == ProjectId::new(2))
        );
    }

    #[test]
    fn test_seed_scope_from_str() {
        assert_eq!("global".parse::<SeedScope>().unwrap(), SeedScope::Global);
        assert_eq!(" Project ".parse::<SeedScope>().unwrap(), SeedScope::Project);
        assert!("everything".parse::<SeedScope>().is_err());
        assert_eq!(SeedScope::default(), SeedScope::Global);
    }

    #[tokio::test]
    async fn test_global_scope_seeds_only_once() {
        let storage = Storage::memory();

        let first = seed_lists(&storage, SeedScope::Global, UserId::new(1), ProjectId::new(1))
            .await
            .unwrap();
        assert_eq!(first.inserted(), 4);

        let second = seed_lists(&storage, SeedScope::Global, UserId::new(1), ProjectId::new(2))
            .await
            .unwrap();
        assert_eq!(second, SeedOutcome::Skipped { existing: 4 });
    }

    #[tokio::test]
    async fn test_project_scope_seeds_each_project() {
        let storage = Storage::memory();

        for project in 1..=2 {
            let outcome = seed_lists(
                &storage,
                SeedScope::Project,
                UserId::new(1),
                ProjectId::new(project),
            )
            .await
            .unwrap();
            assert_eq!(outcome.inserted(), 4);
        }

        let again = seed_lists(&storage, SeedScope::Project, UserId::new(1), ProjectId::new(2))
            .await
            .unwrap();
        assert_eq!(again.inserted(), 0);
        assert_eq!(storage.lists.count(ListFilter::default()).await.unwrap(), 8);
    }
}

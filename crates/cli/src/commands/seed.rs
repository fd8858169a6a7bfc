//! Seed a project's default lists.
//!
//! Runs the same routine as project creation, so a project that already has
//! lists in the chosen scope is left untouched.
//!
//! # Usage
//!
//! ```bash
//! taskboard-cli seed --user 1 --project 1 --scope project
//! ```

use taskboard_api::db::Storage;
use taskboard_api::services::seed::{SeedOutcome, SeedScope, seed_lists};
use taskboard_core::{ProjectId, UserId};

use super::{CommandError, connect};

/// Seed the default lists for `project`, owned by `user`.
///
/// # Errors
///
/// Returns `CommandError` if the connection or the seed routine fails.
pub async fn run(user: UserId, project: ProjectId, scope: SeedScope) -> Result<(), CommandError> {
    let storage = Storage::postgres(connect().await?);

    match seed_lists(&storage, scope, user, project).await? {
        SeedOutcome::Skipped { existing } => {
            tracing::info!("Skipped: {existing} list(s) already exist in {scope} scope");
        }
        SeedOutcome::Seeded(lists) => {
            tracing::info!("Seeded {} list(s) for project {project}", lists.len());
        }
    }
    Ok(())
}

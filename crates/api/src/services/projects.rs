//! Project use cases.

use tracing::instrument;

use taskboard_core::{Paginated, ProjectId};

use super::ServiceError;
use super::seed::{self, SeedScope};
use crate::db::Storage;
use crate::models::{
    CreateProjectInput, DeleteAck, DeleteProjectInput, Project, ProjectFilter, Projected,
    QueryDescriptor, UpdateProjectInput,
};

/// Create a project, then seed its default lists.
///
/// The project is kept even if seeding fails.
///
/// # Errors
///
/// Returns `ServiceError::StoreFailure` if the insert or the seed run fails.
#[instrument(skip(storage, input), fields(user_id = %input.user_id))]
pub async fn create_project(
    storage: &Storage,
    scope: SeedScope,
    input: CreateProjectInput,
) -> Result<Project, ServiceError> {
    let project = storage.projects.insert(input.title, input.user_id).await?;
    tracing::debug!(project_id = %project.id, "Project created");

    seed::seed_lists(storage, scope, project.user_id, project.id).await?;

    Ok(project)
}

/// One page of a user's projects, plus the total match count.
///
/// The user is resolved before any project is queried.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` if `userId` is missing or unknown and
/// `ServiceError::StoreFailure` if the store fails.
#[instrument(skip_all, fields(user_id = ?descriptor.query.user_id))]
pub async fn get_projects(
    storage: &Storage,
    descriptor: &QueryDescriptor<ProjectFilter>,
) -> Result<Paginated<Projected<Project>>, ServiceError> {
    let user_not_found = || ServiceError::NotFound("User not found".to_string());

    let user_id = descriptor.query.user_id.ok_or_else(user_not_found)?;
    storage
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    let count = storage.projects.count(descriptor.query).await?;
    let rows = storage
        .projects
        .find(descriptor.query, &descriptor.cursor)
        .await?;

    Ok(Paginated::new(count, rows).map(|project| descriptor.select.project(project)))
}

/// Merge the fields present in `update` into project `id`.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` if the project does not exist and
/// `ServiceError::StoreFailure` if the store fails.
#[instrument(skip(storage, update))]
pub async fn edit_project(
    storage: &Storage,
    update: UpdateProjectInput,
    id: ProjectId,
) -> Result<Project, ServiceError> {
    let mut project = storage
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

    project.apply(update);
    Ok(storage.projects.save(&project).await?)
}

/// Delete project `id` if it belongs to `input.user_id`. Its lists are kept.
///
/// # Errors
///
/// Returns `ServiceError::StoreFailure` if the delete fails.
#[instrument(skip(storage, input), fields(user_id = %input.user_id))]
pub async fn delete_project(
    storage: &Storage,
    id: ProjectId,
    input: DeleteProjectInput,
) -> Result<DeleteAck, ServiceError> {
    let deleted_count = storage.projects.delete_owned(id, input.user_id).await?;
    if deleted_count == 0 {
        tracing::debug!("No project matched id and owner, nothing deleted");
    }
    Ok(DeleteAck { deleted_count })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use taskboard_core::UserId;

    use super::*;
    use crate::models::{ListFilter, NewUser, ProjectsQuery};

    fn input(title: &str, user: i32) -> CreateProjectInput {
        CreateProjectInput {
            title: Some(title.to_string()),
            user_id: UserId::new(user),
        }
    }

    #[tokio::test]
    async fn test_create_project_seeds_first_project_only() {
        let storage = Storage::memory();

        let first = create_project(&storage, SeedScope::Global, input("Dashboard", 1))
            .await
            .unwrap();
        let lists = storage
            .lists
            .find(ListFilter::default(), &crate::models::Cursor::default())
            .await
            .unwrap();
        assert_eq!(lists.len(), 4);
        assert!(
            lists
                .iter()
                .all(|l| l.project_id == first.id && l.user_id == UserId::new(1))
        );

        create_project(&storage, SeedScope::Global, input("Second", 1))
            .await
            .unwrap();
        assert_eq!(
            storage.lists.count(ListFilter::default()).await.unwrap(),
            4
        );
    }

    #[tokio::test]
    async fn test_create_project_with_project_scope_seeds_every_project() {
        let storage = Storage::memory();
        create_project(&storage, SeedScope::Project, input("A", 1))
            .await
            .unwrap();
        let second = create_project(&storage, SeedScope::Project, input("B", 1))
            .await
            .unwrap();

        assert_eq!(
            storage
                .lists
                .count(ListFilter::for_project(second.id))
                .await
                .unwrap(),
            4
        );
    }

    #[tokio::test]
    async fn test_get_projects_requires_existing_user() {
        let storage = Storage::memory();
        create_project(&storage, SeedScope::Global, input("A", 7))
            .await
            .unwrap();

        let missing = ProjectsQuery {
            user_id: Some(UserId::new(7)),
            ..ProjectsQuery::default()
        }
        .into_descriptor()
        .unwrap();
        let result = get_projects(&storage, &missing).await;
        assert!(matches!(result, Err(ServiceError::NotFound(msg)) if msg == "User not found"));

        let absent = ProjectsQuery::default().into_descriptor().unwrap();
        assert!(matches!(
            get_projects(&storage, &absent).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_projects_for_known_user() {
        let storage = Storage::memory();
        let user = storage.users.insert(NewUser::default()).await.unwrap();
        create_project(&storage, SeedScope::Global, input("Mine", user.id.as_i32()))
            .await
            .unwrap();
        create_project(&storage, SeedScope::Global, input("Other", 99))
            .await
            .unwrap();

        let descriptor = ProjectsQuery {
            user_id: Some(user.id),
            ..ProjectsQuery::default()
        }
        .into_descriptor()
        .unwrap();
        let page = get_projects(&storage, &descriptor).await.unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.rows[0].title.as_deref(), Some("Mine"));
    }

    #[tokio::test]
    async fn test_edit_and_delete_project() {
        let storage = Storage::memory();
        let project = create_project(&storage, SeedScope::Global, input("Old", 1))
            .await
            .unwrap();

        let edited = edit_project(
            &storage,
            UpdateProjectInput {
                title: Some(Some("New".to_string())),
                user_id: None,
            },
            project.id,
        )
        .await
        .unwrap();
        assert_eq!(edited.title.as_deref(), Some("New"));
        assert_eq!(edited.user_id, UserId::new(1));

        let ack = delete_project(
            &storage,
            project.id,
            DeleteProjectInput {
                user_id: UserId::new(1),
            },
        )
        .await
        .unwrap();
        assert_eq!(ack.deleted_count, 1);
        assert_eq!(
            storage.lists.count(ListFilter::default()).await.unwrap(),
            4
        );
    }
}

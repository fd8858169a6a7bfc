//! List use cases.

use tracing::instrument;

use taskboard_core::{ListId, Paginated};

use super::ServiceError;
use crate::db::Storage;
use crate::models::{
    CreateCardInput, CreateListInput, DeleteAck, DeleteListInput, List, ListFilter, Projected,
    QueryDescriptor, UpdateListInput,
};

/// Create an empty list.
///
/// # Errors
///
/// Returns `ServiceError::StoreFailure` if the insert fails.
#[instrument(skip_all, fields(user_id = %input.user_id, project_id = %input.project_id))]
pub async fn create_list(storage: &Storage, input: CreateListInput) -> Result<List, ServiceError> {
    let list = storage.lists.insert(input.into()).await?;
    tracing::debug!(list_id = %list.id, "List created");
    Ok(list)
}

/// Append the `cards` payload to a list as a single new card.
///
/// # Errors
///
/// Returns `ServiceError::ValidationFailed` if no card payload was given,
/// `ServiceError::NotFound` if the list does not exist, and
/// `ServiceError::StoreFailure` if the store fails.
#[instrument(skip_all, fields(list_id = %input.list_id, user_id = %input.user_id))]
pub async fn create_card(storage: &Storage, input: CreateCardInput) -> Result<List, ServiceError> {
    if input.cards.is_null() {
        return Err(ServiceError::ValidationFailed(
            "cards is required".to_string(),
        ));
    }

    let mut list = storage
        .lists
        .find_by_id(input.list_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("List not found".to_string()))?;

    list.cards.push(input.cards);
    Ok(storage.lists.save(&list).await?)
}

/// One page of lists matching the descriptor, plus the total match count.
///
/// # Errors
///
/// Returns `ServiceError::StoreFailure` if either store call fails.
#[instrument(skip_all)]
pub async fn get_lists(
    storage: &Storage,
    descriptor: &QueryDescriptor<ListFilter>,
) -> Result<Paginated<Projected<List>>, ServiceError> {
    let count = storage.lists.count(descriptor.query).await?;
    let rows = storage
        .lists
        .find(descriptor.query, &descriptor.cursor)
        .await?;

    Ok(Paginated::new(count, rows).map(|list| descriptor.select.project(list)))
}

/// Merge the fields present in `update` into list `id`.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` if the list does not exist and
/// `ServiceError::StoreFailure` if the store fails.
#[instrument(skip(storage, update))]
pub async fn edit_list(
    storage: &Storage,
    update: UpdateListInput,
    id: ListId,
) -> Result<List, ServiceError> {
    let mut list = storage
        .lists
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("List not found".to_string()))?;

    list.apply(update);
    Ok(storage.lists.save(&list).await?)
}

/// Delete list `id` if it belongs to `input.user_id`.
///
/// A mismatched owner deletes nothing and still succeeds.
///
/// # Errors
///
/// Returns `ServiceError::StoreFailure` if the delete fails.
#[instrument(skip(storage, input), fields(user_id = %input.user_id))]
pub async fn delete_list(
    storage: &Storage,
    id: ListId,
    input: DeleteListInput,
) -> Result<DeleteAck, ServiceError> {
    let deleted_count = storage.lists.delete_owned(id, input.user_id).await?;
    if deleted_count == 0 {
        tracing::debug!("No list matched id and owner, nothing deleted");
    }
    Ok(DeleteAck { deleted_count })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use taskboard_core::{ProjectId, UserId};

    use super::*;
    use crate::models::ListsQuery;

    async fn seeded_list(storage: &Storage) -> List {
        create_list(
            storage,
            CreateListInput {
                title: Some("Backlog".to_string()),
                user_id: UserId::new(1),
                project_id: ProjectId::new(1),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_list_starts_empty() {
        let storage = Storage::memory();
        let list = seeded_list(&storage).await;

        assert!(list.cards.is_empty());
        assert!(!list.has_create);
        assert_eq!(list.title.as_deref(), Some("Backlog"));
    }

    #[tokio::test]
    async fn test_create_card_pushes_payload_as_one_element() {
        let storage = Storage::memory();
        let list = seeded_list(&storage).await;
        let payload = json!([{ "content": "a" }, { "content": "b" }]);

        let updated = create_card(
            &storage,
            CreateCardInput {
                list_id: list.id,
                cards: payload.clone(),
                user_id: UserId::new(1),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.cards, vec![payload]);
    }

    #[tokio::test]
    async fn test_create_card_on_missing_list_is_not_found() {
        let storage = Storage::memory();
        let result = create_card(
            &storage,
            CreateCardInput {
                list_id: ListId::new(404),
                cards: json!({ "content": "lost" }),
                user_id: UserId::new(1),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(
            storage.lists.count(ListFilter::default()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_create_card_requires_payload() {
        let storage = Storage::memory();
        let list = seeded_list(&storage).await;
        let result = create_card(
            &storage,
            CreateCardInput {
                list_id: list.id,
                cards: serde_json::Value::Null,
                user_id: UserId::new(1),
            },
        )
        .await;

        assert!(
            matches!(result, Err(ServiceError::ValidationFailed(ref msg)) if msg == "cards is required")
        );
    }

    #[tokio::test]
    async fn test_create_card_accepts_empty_array_as_one_card() {
        let storage = Storage::memory();
        let list = seeded_list(&storage).await;
        let updated = create_card(
            &storage,
            CreateCardInput {
                list_id: list.id,
                cards: serde_json::json!([]),
                user_id: UserId::new(1),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.cards, vec![serde_json::json!([])]);
    }

    #[tokio::test]
    async fn test_edit_list_merges_present_fields() {
        let storage = Storage::memory();
        let list = seeded_list(&storage).await;

        let updated = edit_list(
            &storage,
            UpdateListInput {
                has_create: Some(true),
                ..UpdateListInput::default()
            },
            list.id,
        )
        .await
        .unwrap();

        assert!(updated.has_create);
        assert_eq!(updated.title.as_deref(), Some("Backlog"));
        assert_eq!(updated.project_id, list.project_id);
    }

    #[tokio::test]
    async fn test_edit_missing_list_is_not_found() {
        let storage = Storage::memory();
        let result = edit_list(&storage, UpdateListInput::default(), ListId::new(9)).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_list_with_other_owner_deletes_nothing() {
        let storage = Storage::memory();
        let list = seeded_list(&storage).await;

        let ack = delete_list(
            &storage,
            list.id,
            DeleteListInput {
                user_id: UserId::new(2),
                project_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(ack.deleted_count, 0);

        let ack = delete_list(
            &storage,
            list.id,
            DeleteListInput {
                user_id: UserId::new(1),
                project_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(ack.deleted_count, 1);
    }

    #[tokio::test]
    async fn test_get_lists_counts_all_matches() {
        let storage = Storage::memory();
        for _ in 0..3 {
            seeded_list(&storage).await;
        }

        let descriptor = ListsQuery {
            project_id: Some(ProjectId::new(1)),
            limit: Some(2),
            ..ListsQuery::default()
        }
        .into_descriptor()
        .unwrap();

        let page = get_lists(&storage, &descriptor).await.unwrap();
        assert_eq!(page.count, 3);
        assert_eq!(page.rows.len(), 2);
    }
}

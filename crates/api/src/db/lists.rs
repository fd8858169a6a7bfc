//! `PostgreSQL` list repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use taskboard_core::{ListId, ProjectId, UserId};

use super::{ListRepository, RepositoryError};
use crate::models::{Card, Cursor, List, ListFilter, NewList};

#[derive(Debug, FromRow)]
struct ListRow {
    id: ListId,
    title: Option<String>,
    has_create: bool,
    cards: Json<Vec<Card>>,
    user_id: UserId,
    project_id: ProjectId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ListRow> for List {
    fn from(row: ListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            has_create: row.has_create,
            cards: row.cards.0,
            user_id: row.user_id,
            project_id: row.project_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: ListFilter) {
    let mut separator = " WHERE ";
    if let Some(user_id) = filter.user_id {
        builder.push(separator).push("user_id = ").push_bind(user_id);
        separator = " AND ";
    }
    if let Some(project_id) = filter.project_id {
        builder.push(separator).push("project_id = ").push_bind(project_id);
    }
}

/// List repository backed by `board.lists`.
#[derive(Clone)]
pub struct PgListRepository {
    pool: PgPool,
}

impl PgListRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListRepository for PgListRepository {
    async fn insert(&self, list: NewList) -> Result<List, RepositoryError> {
        let row = sqlx::query_as::<_, ListRow>(
            r"
            INSERT INTO board.lists (title, has_create, cards, user_id, project_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, has_create, cards, user_id, project_id,
                      created_at, updated_at
            ",
        )
        .bind(list.title)
        .bind(list.has_create)
        .bind(Json(list.cards))
        .bind(list.user_id)
        .bind(list.project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_many(&self, lists: Vec<NewList>) -> Result<Vec<List>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(lists.len());

        for list in lists {
            let row = sqlx::query_as::<_, ListRow>(
                r"
                INSERT INTO board.lists (title, has_create, cards, user_id, project_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, title, has_create, cards, user_id, project_id,
                          created_at, updated_at
                ",
            )
            .bind(list.title)
            .bind(list.has_create)
            .bind(Json(list.cards))
            .bind(list.user_id)
            .bind(list.project_id)
            .fetch_one(&mut *tx)
            .await?;

            inserted.push(row.into());
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn find_by_id(&self, id: ListId) -> Result<Option<List>, RepositoryError> {
        let row = sqlx::query_as::<_, ListRow>(
            r"
            SELECT id, title, has_create, cards, user_id, project_id,
                   created_at, updated_at
            FROM board.lists
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find(
        &self,
        filter: ListFilter,
        cursor: &Cursor,
    ) -> Result<Vec<List>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r"
            SELECT id, title, has_create, cards, user_id, project_id,
                   created_at, updated_at
            FROM board.lists
            ",
        );
        push_filter(&mut builder, filter);

        builder.push(" ORDER BY ");
        builder.push(cursor.order_by_sql());
        builder
            .push(" LIMIT ")
            .push_bind(cursor.limit)
            .push(" OFFSET ")
            .push_bind(cursor.skip);

        let rows = builder
            .build_query_as::<ListRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: ListFilter) -> Result<i64, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM board.lists");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn save(&self, list: &List) -> Result<List, RepositoryError> {
        let row = sqlx::query_as::<_, ListRow>(
            r"
            UPDATE board.lists
            SET title = $1,
                has_create = $2,
                cards = $3,
                user_id = $4,
                project_id = $5
            WHERE id = $6
            RETURNING id, title, has_create, cards, user_id, project_id,
                      created_at, updated_at
            ",
        )
        .bind(list.title.as_deref())
        .bind(list.has_create)
        .bind(Json(&list.cards))
        .bind(list.user_id)
        .bind(list.project_id)
        .bind(list.id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    async fn delete_owned(&self, id: ListId, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM board.lists WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

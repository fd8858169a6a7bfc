//! `PostgreSQL` project repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use taskboard_core::{ProjectId, UserId};

use super::{ProjectRepository, RepositoryError};
use crate::models::{Cursor, Project, ProjectFilter};

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: ProjectId,
    title: Option<String>,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: ProjectFilter) {
    if let Some(user_id) = filter.user_id {
        builder.push(" WHERE user_id = ").push_bind(user_id);
    }
}

/// Project repository backed by `board.projects`.
#[derive(Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn insert(
        &self,
        title: Option<String>,
        user_id: UserId,
    ) -> Result<Project, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            INSERT INTO board.projects (title, user_id)
            VALUES ($1, $2)
            RETURNING id, title, user_id, created_at, updated_at
            ",
        )
        .bind(title)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            SELECT id, title, user_id, created_at, updated_at
            FROM board.projects
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
        filter: ProjectFilter,
        cursor: &Cursor,
    ) -> Result<Vec<Project>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, title, user_id, created_at, updated_at FROM board.projects",
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
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: ProjectFilter) -> Result<i64, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM board.projects");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn save(&self, project: &Project) -> Result<Project, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            UPDATE board.projects
            SET title = $1, user_id = $2
            WHERE id = $3
            RETURNING id, title, user_id, created_at, updated_at
            ",
        )
        .bind(project.title.as_deref())
        .bind(project.user_id)
        .bind(project.id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    async fn delete_owned(
        &self,
        id: ProjectId,
        user_id: UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM board.projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

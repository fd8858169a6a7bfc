//! In-process storage backend.
//!
//! Holds every table in a `tokio` `RwLock`ed map. IDs come from per-table
//! sequences and timestamps from a clock that never repeats, so ordering by
//! `createdAt` is deterministic.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use taskboard_core::{ListId, ProjectId, UserId};

use super::{ListRepository, ProjectRepository, RepositoryError, UserRepository};
use crate::models::{Cursor, List, ListFilter, NewList, NewUser, Project, ProjectFilter, User};

/// In-memory implementation of every repository trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: RwLock<BTreeMap<ListId, List>>,
    projects: RwLock<BTreeMap<ProjectId, Project>>,
    users: RwLock<BTreeMap<UserId, User>>,
    list_seq: AtomicI32,
    project_seq: AtomicI32,
    user_seq: AtomicI32,
    clock: AtomicI64,
}

impl MemoryStore {
    fn next_id(seq: &AtomicI32) -> i32 {
        seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current time, strictly later than any previously returned value.
    fn now(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .clock
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        DateTime::from_timestamp_micros(now.max(previous + 1)).unwrap_or_else(Utc::now)
    }

    fn build_list(&self, list: NewList) -> List {
        let now = self.now();
        List {
            id: ListId::new(Self::next_id(&self.list_seq)),
            title: list.title,
            has_create: list.has_create,
            cards: list.cards,
            user_id: list.user_id,
            project_id: list.project_id,
            created_at: now,
            updated_at: now,
        }
    }
}

fn count_matching<T>(rows: impl Iterator<Item = T>, matches: impl Fn(&T) -> bool) -> i64 {
    let count = rows.filter(|row| matches(row)).count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn insert(&self, list: NewList) -> Result<List, RepositoryError> {
        let list = self.build_list(list);
        self.lists.write().await.insert(list.id, list.clone());
        Ok(list)
    }

    async fn insert_many(&self, lists: Vec<NewList>) -> Result<Vec<List>, RepositoryError> {
        let mut table = self.lists.write().await;
        let inserted: Vec<List> = lists
            .into_iter()
            .map(|list| self.build_list(list))
            .collect();
        for list in &inserted {
            table.insert(list.id, list.clone());
        }
        Ok(inserted)
    }

    async fn find_by_id(&self, id: ListId) -> Result<Option<List>, RepositoryError> {
        Ok(self.lists.read().await.get(&id).cloned())
    }

    async fn find(
        &self,
        filter: ListFilter,
        cursor: &Cursor,
    ) -> Result<Vec<List>, RepositoryError> {
        let matching: Vec<List> = self
            .lists
            .read()
            .await
            .values()
            .filter(|list| filter.matches(list))
            .cloned()
            .collect();
        Ok(cursor.apply(matching))
    }

    async fn count(&self, filter: ListFilter) -> Result<i64, RepositoryError> {
        let table = self.lists.read().await;
        Ok(count_matching(table.values(), |list| filter.matches(list)))
    }

    async fn save(&self, list: &List) -> Result<List, RepositoryError> {
        let mut table = self.lists.write().await;
        let stored = table.get_mut(&list.id).ok_or(RepositoryError::NotFound)?;
        *stored = List {
            created_at: stored.created_at,
            updated_at: self.now(),
            ..list.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_owned(&self, id: ListId, user_id: UserId) -> Result<u64, RepositoryError> {
        let mut table = self.lists.write().await;
        if table.get(&id).is_some_and(|list| list.user_id == user_id) {
            table.remove(&id);
            return Ok(1);
        }
        Ok(0)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn insert(
        &self,
        title: Option<String>,
        user_id: UserId,
    ) -> Result<Project, RepositoryError> {
        let now = self.now();
        let project = Project {
            id: ProjectId::new(Self::next_id(&self.project_seq)),
            title,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn find(
        &self,
        filter: ProjectFilter,
        cursor: &Cursor,
    ) -> Result<Vec<Project>, RepositoryError> {
        let matching: Vec<Project> = self
            .projects
            .read()
            .await
            .values()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect();
        Ok(cursor.apply(matching))
    }

    async fn count(&self, filter: ProjectFilter) -> Result<i64, RepositoryError> {
        let table = self.projects.read().await;
        Ok(count_matching(table.values(), |project| {
            filter.matches(project)
        }))
    }

    async fn save(&self, project: &Project) -> Result<Project, RepositoryError> {
        let mut table = self.projects.write().await;
        let stored = table
            .get_mut(&project.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = Project {
            created_at: stored.created_at,
            updated_at: self.now(),
            ..project.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_owned(
        &self,
        id: ProjectId,
        user_id: UserId,
    ) -> Result<u64, RepositoryError> {
        let mut table = self.projects.write().await;
        if table
            .get(&id)
            .is_some_and(|project| project.user_id == user_id)
        {
            table.remove(&id);
            return Ok(1);
        }
        Ok(0)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let now = self.now();
        let user = User {
            id: UserId::new(Self::next_id(&self.user_seq)),
            name: user.name,
            created_at: now,
            updated_at: now,
        };
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }
}

//! List domain types.
//!
//! A list is a column on a project board. Its cards are embedded as free-form
//! JSON values and are stored in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskboard_core::{ListId, ProjectId, UserId};

use super::query::{SortField, Sortable};

/// A free-form card embedded in a list (`id`, `content`, `labels`, `user` by convention).
pub type Card = serde_json::Value;

/// A list belonging to one project and one user.
///
/// Serializes as the public JSON view (camelCase, `id` instead of the
/// internal row key, timestamps included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// Store-generated list ID.
    pub id: ListId,
    /// Column title.
    pub title: Option<String>,
    /// Whether clients render the "new card" affordance on this column.
    pub has_create: bool,
    /// Embedded cards, in insertion order.
    pub cards: Vec<Card>,
    /// Owner of the list.
    pub user_id: UserId,
    /// Project the list belongs to.
    pub project_id: ProjectId,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
    /// When the list was last updated.
    pub updated_at: DateTime<Utc>,
}

impl List {
    /// Field names of the JSON view, used to validate `fields` projections.
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "hasCreate",
        "cards",
        "userId",
        "projectId",
        "createdAt",
        "updatedAt",
    ];

    /// Overwrite every field present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: UpdateListInput) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(has_create) = update.has_create {
            self.has_create = has_create;
        }
        if let Some(cards) = update.cards {
            self.cards = cards;
        }
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
        if let Some(project_id) = update.project_id {
            self.project_id = project_id;
        }
    }
}

impl Sortable for List {
    fn sort_id(&self) -> i32 {
        self.id.as_i32()
    }

    fn sort_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn sort_timestamp(&self, field: SortField) -> DateTime<Utc> {
        match field {
            SortField::UpdatedAt => self.updated_at,
            _ => self.created_at,
        }
    }
}

/// A list about to be inserted. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewList {
    pub title: Option<String>,
    pub has_create: bool,
    pub cards: Vec<Card>,
    pub user_id: UserId,
    pub project_id: ProjectId,
}

/// Body of `POST /lists`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListInput {
    pub title: Option<String>,
    pub user_id: UserId,
    pub project_id: ProjectId,
}

impl From<CreateListInput> for NewList {
    fn from(input: CreateListInput) -> Self {
        Self {
            title: input.title,
            has_create: false,
            cards: Vec::new(),
            user_id: input.user_id,
            project_id: input.project_id,
        }
    }
}

/// Body of `POST /lists/card`.
///
/// The whole `cards` payload becomes a single new element of the list's cards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardInput {
    pub list_id: ListId,
    #[serde(default)]
    pub cards: Card,
    pub user_id: UserId,
}

/// Body of `PUT /lists/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListInput {
    /// `null` clears the title.
    #[serde(default, deserialize_with = "super::nullable")]
    pub title: Option<Option<String>>,
    pub has_create: Option<bool>,
    pub cards: Option<Vec<Card>>,
    pub user_id: Option<UserId>,
    pub project_id: Option<ProjectId>,
}

/// Body of `DELETE /lists/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteListInput {
    /// Claimed owner; only a list owned by this user is deleted.
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
}

/// Filter criteria for listing lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub user_id: Option<UserId>,
    pub project_id: Option<ProjectId>,
}

impl ListFilter {
    /// Filter matching every list of a project.
    #[must_use]
    pub const fn for_project(project_id: ProjectId) -> Self {
        Self {
            user_id: None,
            project_id: Some(project_id),
        }
    }

    /// Whether `list` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, list: &List) -> bool {
        self.user_id.is_none_or(|id| id == list.user_id)
            && self.project_id.is_none_or(|id| id == list.project_id)
    }
}

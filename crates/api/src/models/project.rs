//! Project domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskboard_core::{ProjectId, UserId};

use super::query::{SortField, Sortable};

/// A project board owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Store-generated project ID.
    pub id: ProjectId,
    /// Board title.
    pub title: Option<String>,
    /// Owner of the project.
    pub user_id: UserId,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Field names of the JSON view, used to validate `fields` projections.
    pub const FIELDS: &'static [&'static str] =
        &["id", "title", "userId", "createdAt", "updatedAt"];

    /// Overwrite every field present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: UpdateProjectInput) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
    }
}

impl Sortable for Project {
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

/// Body of `POST /projects`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub title: Option<String>,
    pub user_id: UserId,
}

/// Body of `PUT /projects/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    /// `null` clears the title.
    #[serde(default, deserialize_with = "super::nullable")]
    pub title: Option<Option<String>>,
    pub user_id: Option<UserId>,
}

/// Body of `DELETE /projects/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectInput {
    /// Claimed owner; only a project owned by this user is deleted.
    pub user_id: UserId,
}

/// Filter criteria for listing projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub user_id: Option<UserId>,
}

impl ProjectFilter {
    /// Whether `project` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        self.user_id.is_none_or(|id| id == project.user_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_without_title_keeps_title() {
        let now = Utc::now();
        let mut project = Project {
            id: ProjectId::new(1),
            title: Some("Dashboard".to_string()),
            user_id: UserId::new(1),
            created_at: now,
            updated_at: now,
        };

        project.apply(UpdateProjectInput {
            title: None,
            user_id: Some(UserId::new(2)),
        });

        assert_eq!(project.title.as_deref(), Some("Dashboard"));
        assert_eq!(project.user_id, UserId::new(2));
    }

    #[test]
    fn test_apply_null_title_clears_title() {
        let now = Utc::now();
        let mut project = Project {
            id: ProjectId::new(1),
            title: Some("Dashboard".to_string()),
            user_id: UserId::new(1),
            created_at: now,
            updated_at: now,
        };

        let update: UpdateProjectInput =
            serde_json::from_value(serde_json::json!({ "title": null })).unwrap();
        project.apply(update);

        assert_eq!(project.title, None);
        assert_eq!(project.user_id, UserId::new(1));
    }
}

//! User domain types.
//!
//! Users are only looked up to validate ownership references; identity and
//! credentials are managed elsewhere.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskboard_core::UserId;

/// A board user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A user about to be inserted.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: Option<String>,
}

//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! taskboard-cli user create --name "Ana"
//! ```

use taskboard_api::db::Storage;
use taskboard_api::models::NewUser;
use taskboard_core::UserId;

use super::{CommandError, connect};

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `CommandError` if the connection or the insert fails.
pub async fn create_user(name: Option<String>) -> Result<UserId, CommandError> {
    let storage = Storage::postgres(connect().await?);

    let user = storage.users.insert(NewUser { name }).await?;

    tracing::info!(
        "User created successfully! ID: {}, Name: {}",
        user.id,
        user.name.as_deref().unwrap_or("-")
    );
    Ok(user.id)
}

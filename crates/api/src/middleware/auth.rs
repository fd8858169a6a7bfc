//! Bearer token authentication.
//!
//! Board routes require `Authorization: Bearer <token>` matching
//! `TASKBOARD_API_TOKEN`.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid API token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_auth: RequireApiToken) -> impl IntoResponse {
///     "ok"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireApiToken;

impl FromRequestParts<AppState> for RequireApiToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        if !constant_time_compare(token.trim(), state.config().api_token.expose_secret()) {
            tracing::warn!(uri = %parts.uri, "Rejected request with invalid API token");
            return Err(AppError::Unauthorized("invalid bearer token".to_string()));
        }

        Ok(Self)
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

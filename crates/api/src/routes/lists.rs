//! List route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use taskboard_core::{ListId, Paginated};

use crate::error::Result;
use crate::middleware::RequireApiToken;
use crate::models::{
    CreateCardInput, CreateListInput, DeleteListInput, List, ListsQuery, Projected,
    UpdateListInput,
};
use crate::services::{ServiceError, lists};
use crate::state::AppState;

/// `POST /lists`
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Json(input): Json<CreateListInput>,
) -> Result<(StatusCode, Json<List>)> {
    let list = lists::create_list(state.storage(), input).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// `POST /lists/card`
pub async fn create_card(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Json(input): Json<CreateCardInput>,
) -> Result<(StatusCode, Json<List>)> {
    let list = lists::create_card(state.storage(), input).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// `GET /lists`
pub async fn index(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Query(query): Query<ListsQuery>,
) -> Result<Json<Paginated<Projected<List>>>> {
    let descriptor = query.into_descriptor().map_err(ServiceError::from)?;
    let page = lists::get_lists(state.storage(), &descriptor).await?;
    Ok(Json(page))
}

/// `PUT /lists/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Path(id): Path<ListId>,
    Json(input): Json<UpdateListInput>,
) -> Result<Json<List>> {
    let list = lists::edit_list(state.storage(), input, id).await?;
    Ok(Json(list))
}

/// `DELETE /lists/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Path(id): Path<ListId>,
    Json(input): Json<DeleteListInput>,
) -> Result<StatusCode> {
    lists::delete_list(state.storage(), id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

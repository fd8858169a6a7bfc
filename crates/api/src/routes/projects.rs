//! Project route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use taskboard_core::{Paginated, ProjectId};

use crate::error::Result;
use crate::middleware::RequireApiToken;
use crate::models::{
    CreateProjectInput, DeleteProjectInput, Project, ProjectsQuery, Projected,
    UpdateProjectInput,
};
use crate::services::{ServiceError, projects};
use crate::state::AppState;

/// `POST /projects`
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Json(input): Json<CreateProjectInput>,
) -> Result<(StatusCode, Json<Project>)> {
    let project = projects::create_project(state.storage(), state.seed_scope(), input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /projects`
pub async fn index(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<Paginated<Projected<Project>>>> {
    let descriptor = query.into_descriptor().map_err(ServiceError::from)?;
    let page = projects::get_projects(state.storage(), &descriptor).await?;
    Ok(Json(page))
}

/// `PUT /projects/{id}`
pub async fn update(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Path(id): Path<ProjectId>,
    Json(input): Json<UpdateProjectInput>,
) -> Result<Json<Project>> {
    let project = projects::edit_project(state.storage(), input, id).await?;
    Ok(Json(project))
}

/// `DELETE /projects/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    Path(id): Path<ProjectId>,
    Json(input): Json<DeleteProjectInput>,
) -> Result<StatusCode> {
    projects::delete_project(state.storage(), id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

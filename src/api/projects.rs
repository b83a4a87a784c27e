use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mongodb::bson::{self, doc, oid::ObjectId};

use crate::app::AppState;
use crate::auth::middleware::RequireAdmin;
use crate::db::models::{Project, ProjectInput, ProjectUpdate};
use crate::error::AppError;

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest(format!("Invalid project id '{id}'")))
}

fn not_found(id: &ObjectId) -> AppError {
    AppError::NotFound(format!("Project {id} not found"))
}

/// `GET /api/public/project/all`: public, non-deleted projects, newest first.
///
/// Document locations are projected out of the list.
pub async fn list_public_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state
        .project_repo
        .read_all(
            doc! { "is_public": true, "is_deleted": false },
            Some(doc! { "html": 0, "markdown": 0 }),
        )
        .await?;
    Ok(Json(projects))
}

/// `GET /api/public/project/{id}`
pub async fn get_public_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    let id = parse_id(&id)?;
    state
        .project_repo
        .read_one(doc! { "_id": id, "is_public": true, "is_deleted": false }, None)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// `GET /api/private/project/all`: every project, including hidden and deleted.
pub async fn list_all_handler(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.project_repo.read_all(doc! {}, None).await?))
}

/// `POST /api/private/project`
pub async fn create_handler(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".into()));
    }

    let project = input.into_project(chrono::Utc::now().timestamp());
    state.project_repo.create(project.clone()).await?;

    tracing::info!("{} created project {}", admin.email, project.id_str);
    Ok((StatusCode::CREATED, Json(project)))
}

/// `PUT /api/private/project/{id}`: set the supplied fields, leave the rest.
pub async fn update_handler(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Result<Json<Project>, AppError> {
    let id = parse_id(&id)?;
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest("Title cannot be empty".into()));
    }
    let set = bson::to_document(&update)
        .map_err(|e| AppError::Internal(format!("Failed to encode update: {e}")))?;
    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".into()));
    }

    state
        .project_repo
        .update(doc! { "_id": id }, set)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// `DELETE /api/private/project/{id}`: soft delete.
pub async fn delete_handler(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    let id = parse_id(&id)?;
    state
        .project_repo
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// `DELETE /api/private/project/{id}/permanent`
pub async fn delete_permanent_handler(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.project_repo.delete_permanent(id).await?;
    tracing::warn!("{} permanently deleted project {id}", admin.email);
    Ok(StatusCode::NO_CONTENT)
}

//! Project API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{current_revision, error, success, ApiResult};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{CreateProjectRequest, MediaAttachment, Project, UpdateProjectRequest};
use crate::AppState;

/// GET /api/projects - List all projects.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let revision_id = current_revision(&state, 0).await;

    match state.repo.list_projects().await {
        Ok(projects) => success(projects, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/projects/:id - Get a single project.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Project> {
    let revision_id = current_revision(&state, 0).await;

    match state.repo.get_project(&id).await {
        Ok(Some(project)) => success(project, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Project {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<Project> {
    let revision_id = current_revision(&state, 0).await;

    if request.title.trim().is_empty() {
        return error(
            AppError::Validation("Title is required".to_string()),
            revision_id,
        );
    }
    if let Err(e) = validate_media(&request.media) {
        return error(e, revision_id);
    }
    if let Err(e) = validate_member_ids(&state.repo, &request.member_ids).await {
        return error(e, revision_id);
    }

    match state.repo.create_project(&request).await {
        Ok(project) => {
            tracing::info!("Created project {} ({})", project.id, project.title);
            let new_revision = current_revision(&state, revision_id).await;
            success(project, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/projects/:id - Update a project.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Project> {
    let revision_id = current_revision(&state, 0).await;

    if matches!(&request.title, Some(title) if title.trim().is_empty()) {
        return error(
            AppError::Validation("Title cannot be empty".to_string()),
            revision_id,
        );
    }
    if let Some(media) = &request.media {
        if let Err(e) = validate_media(media) {
            return error(e, revision_id);
        }
    }
    if let Some(member_ids) = &request.member_ids {
        if let Err(e) = validate_member_ids(&state.repo, member_ids).await {
            return error(e, revision_id);
        }
    }

    match state.repo.update_project(&id, &request).await {
        Ok(project) => {
            let new_revision = current_revision(&state, revision_id).await;
            success(project, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/projects/:id - Delete a project.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = current_revision(&state, 0).await;

    match state.repo.delete_project(&id).await {
        Ok(()) => {
            let new_revision = current_revision(&state, revision_id).await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

fn validate_media(media: &[MediaAttachment]) -> Result<(), AppError> {
    if media.iter().any(|m| m.url.trim().is_empty()) {
        return Err(AppError::Validation(
            "Media attachments need a URL".to_string(),
        ));
    }
    Ok(())
}

async fn validate_member_ids(repo: &Repository, member_ids: &[String]) -> Result<(), AppError> {
    let missing = repo.missing_members(member_ids).await?;
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Unknown member ids: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

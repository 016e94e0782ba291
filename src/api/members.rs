//! Member API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{current_revision, error, success, ApiResult};
use crate::errors::AppError;
use crate::fallback;
use crate::models::{
    normalize_badges, CreateMemberRequest, Member, Project, UpdateMemberRequest,
};
use crate::roster::RosterView;
use crate::AppState;

/// Roster tab and sort selection.
///
/// `filter` is an older name for `specialty`; when both are sent,
/// `specialty` wins.
#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    /// Specialty tab (`all`, `frontend`, `backend`, `mobile`, `ai`, `devops`, `design`).
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
    /// Sort option (`default`, `graduation`, `openToWork`, `nameAsc`, `nameDesc`).
    #[serde(default)]
    pub sort: Option<String>,
}

/// GET /api/members - List the roster, filtered and sorted.
pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<RosterQuery>,
) -> ApiResult<Vec<Member>> {
    let revision_id = current_revision(&state, 0).await;

    let mut members = match state.repo.list_members().await {
        Ok(members) => members,
        Err(e) => return error(e, revision_id),
    };

    if members.is_empty() {
        members = fallback_roster(&state).await;
    }

    let specialty = params.specialty.as_deref().or(params.filter.as_deref());
    let view = RosterView::from_params(specialty, params.sort.as_deref());

    success(view.render(&members, &state.collator), revision_id)
}

/// GET /api/members/:id - Get a single member.
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Member> {
    let revision_id = current_revision(&state, 0).await;

    match state.repo.get_member(&id).await {
        Ok(Some(member)) => success(member, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Member {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/members/:id/projects - Projects the member worked on.
pub async fn list_member_projects(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Project>> {
    let revision_id = current_revision(&state, 0).await;

    match state.repo.get_member(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Member {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    }

    match state.repo.list_projects_for_member(&id).await {
        Ok(projects) => success(projects, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/members - Create a new member.
pub async fn create_member(
    State(state): State<AppState>,
    Json(mut request): Json<CreateMemberRequest>,
) -> ApiResult<Member> {
    let revision_id = current_revision(&state, 0).await;

    // Validate required fields
    if request.name.trim().is_empty() {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }
    request.badges = match checked_badges(request.badges.take()) {
        Ok(badges) => badges,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.create_member(&request).await {
        Ok(member) => {
            tracing::info!("Created member {} ({})", member.id, member.name);
            let new_revision = current_revision(&state, revision_id).await;
            success(member, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/members/:id - Update a member.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateMemberRequest>,
) -> ApiResult<Member> {
    let revision_id = current_revision(&state, 0).await;

    if matches!(&request.name, Some(name) if name.trim().is_empty()) {
        return error(
            AppError::Validation("Name cannot be empty".to_string()),
            revision_id,
        );
    }
    request.badges = match checked_badges(request.badges.take()) {
        Ok(badges) => badges,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.update_member(&id, &request).await {
        Ok(member) => {
            let new_revision = current_revision(&state, revision_id).await;
            success(member, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/members/:id - Delete a member.
pub async fn delete_member(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let revision_id = current_revision(&state, 0).await;

    match state.repo.delete_member(&id).await {
        Ok(()) => {
            tracing::info!("Deleted member {}", id);
            let new_revision = current_revision(&state, revision_id).await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

fn checked_badges(badges: Option<Vec<String>>) -> Result<Option<Vec<String>>, AppError> {
    badges
        .map(|badges| {
            normalize_badges(&badges)
                .map_err(|bad| AppError::Validation(format!("Unknown badge: {}", bad)))
        })
        .transpose()
}

/// Roster export served while the members table is still empty.
async fn fallback_roster(state: &AppState) -> Vec<Member> {
    let Some(path) = state.config.roster_fallback_path.as_deref() else {
        return Vec::new();
    };

    match fallback::load_roster(path).await {
        Ok(members) => {
            tracing::info!(
                "Members table is empty, serving {} members from {:?}",
                members.len(),
                path
            );
            members
        }
        Err(e) => {
            tracing::warn!("Failed to load fallback roster from {:?}: {}", path, e);
            Vec::new()
        }
    }
}

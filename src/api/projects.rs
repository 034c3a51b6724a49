//! Project API endpoints: public listing/detail plus back-office CRUD,
//! team reconciliation and media attachment.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateMediaFileRequest, CreateProjectRequest, MediaFile, Project, ProjectDateField,
    ProjectFilter, ProjectSort, ProjectStatus, ReconcileTeamRequest, ReconcileTeamResponse,
    SetTeamRoleRequest, UpdateProjectRequest,
};
use crate::paging::{paginate, Page};
use crate::AppState;

/// Default and maximum page sizes for project listings.
const DEFAULT_PAGE_SIZE: usize = 12;
const MAX_PAGE_SIZE: usize = 100;

/// Query parameters for the project listing: filter criteria, sort and paging.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Case-insensitive substring search.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Which project date the range applies to (start/end/event/created).
    #[serde(default)]
    pub date_field: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_photos: Option<i64>,
    #[serde(default)]
    pub min_videos: Option<i64>,
    #[serde(default)]
    pub min_partners: Option<i64>,
    #[serde(default)]
    pub min_team: Option<i64>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    /// Zero-based page index.
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ProjectListQuery {
    /// Build the typed filter, rejecting inputs the evaluator is not
    /// responsible for (unknown status, inverted date range).
    fn filter(&self) -> Result<ProjectFilter, AppError> {
        let status = match &self.status {
            Some(s) => Some(
                ProjectStatus::from_str(s)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{}'", s)))?,
            ),
            None => None,
        };

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "dateFrom must not be after dateTo".to_string(),
                ));
            }
        }

        Ok(ProjectFilter {
            category: self.category.clone(),
            status,
            search: self.q.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
            date_field: self
                .date_field
                .as_deref()
                .map(ProjectDateField::parse)
                .unwrap_or_default(),
            location: self.location.clone(),
            min_photos: self.min_photos,
            min_videos: self.min_videos,
            min_partners: self.min_partners,
            min_team: self.min_team,
        })
    }

    fn sort(&self) -> ProjectSort {
        ProjectSort::parse(self.sort.as_deref(), self.order.as_deref())
    }
}

/// GET /api/projects - List projects with filtering, sorting and pagination.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<Page<Project>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return error(e, revision_id),
    };
    if query.page_size > MAX_PAGE_SIZE {
        return error(
            AppError::BadRequest(format!("pageSize must be at most {}", MAX_PAGE_SIZE)),
            revision_id,
        );
    }

    let mut candidates = match state.repo.list_projects().await {
        Ok(projects) => projects,
        Err(e) => return error(e, revision_id),
    };
    query.sort().apply(&mut candidates);

    match paginate(candidates, query.page, query.page_size, |p| {
        filter.matches(p)
    }) {
        Ok(page) => success(page, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/projects/:slug - Get a single project by slug.
pub async fn get_project_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Project> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_project_by_slug(&slug).await {
        Ok(Some(project)) => success(project, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Project '{}' not found", slug)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/admin/projects/:id - Get a single project by id.
pub async fn get_project(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Project> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_project(id).await {
        Ok(Some(project)) => success(project, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Project {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<Project> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_project(&request).await {
        Ok(project) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(project, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/projects/:id - Update a project.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Project> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_project(id, &request).await {
        Ok(project) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(project, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/projects/:id - Delete a project.
pub async fn delete_project(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_project(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/projects/:id/team - Reconcile the project's team with the
/// posted member id set.
pub async fn reconcile_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ReconcileTeamRequest>,
) -> ApiResult<ReconcileTeamResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.reconcile_team(id, &request.member_ids).await {
        Ok((project, skipped)) => {
            if !skipped.is_empty() {
                tracing::warn!(
                    project_id = id,
                    skipped = ?skipped,
                    "Skipped malformed member ids during team reconciliation"
                );
            }
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(ReconcileTeamResponse { project, skipped }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/projects/:id/team/:member_id/role - Set a member's role on
/// a project.
pub async fn set_team_role(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(i64, i64)>,
    Json(request): Json<SetTeamRoleRequest>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .set_team_role(id, member_id, request.role.as_deref())
        .await
    {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/projects/:id/media - Attach a media file to a project.
pub async fn attach_media(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateMediaFileRequest>,
) -> ApiResult<MediaFile> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.attach_media(id, &request).await {
        Ok(media) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(media, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/media/:id - Delete a media file.
pub async fn delete_media(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_media(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

//! Category API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::AppState;

/// GET /api/categories - List all categories.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_categories().await {
        Ok(categories) => success(categories, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/categories - Create a category.
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<Category> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_category(&request).await {
        Ok(category) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(category, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/categories/:id - Rename a category.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_category(id, &request).await {
        Ok(category) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(category, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/categories/:id - Delete a category.
pub async fn delete_category(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_category(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

//! Photo gallery API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateGalleryItemRequest, CreateGalleryRequest, PhotoGallery, PhotoGalleryItem,
    PhotoGalleryWithItems, UpdateGalleryRequest,
};
use crate::AppState;

/// GET /api/galleries - List published galleries.
pub async fn list_galleries(State(state): State<AppState>) -> ApiResult<Vec<PhotoGallery>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_galleries(true).await {
        Ok(galleries) => success(galleries, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/galleries/:id - Get a published gallery with its items.
pub async fn get_gallery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<PhotoGalleryWithItems> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_gallery(id).await {
        Ok(Some(gallery)) if gallery.gallery.published => success(gallery, revision_id),
        Ok(_) => error(
            AppError::NotFound(format!("Gallery {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/admin/galleries - List all galleries, drafts included.
pub async fn list_galleries_admin(State(state): State<AppState>) -> ApiResult<Vec<PhotoGallery>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_galleries(false).await {
        Ok(galleries) => success(galleries, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/admin/galleries/:id - Get any gallery with its items.
pub async fn get_gallery_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<PhotoGalleryWithItems> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_gallery(id).await {
        Ok(Some(gallery)) => success(gallery, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Gallery {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/galleries - Create a gallery.
pub async fn create_gallery(
    State(state): State<AppState>,
    Json(request): Json<CreateGalleryRequest>,
) -> ApiResult<PhotoGallery> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_gallery(&request).await {
        Ok(gallery) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(gallery, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/galleries/:id - Update a gallery.
pub async fn update_gallery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateGalleryRequest>,
) -> ApiResult<PhotoGallery> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_gallery(id, &request).await {
        Ok(gallery) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(gallery, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/galleries/:id - Delete a gallery and its items.
pub async fn delete_gallery(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_gallery(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/galleries/:id/items - Add an item to a gallery.
pub async fn add_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateGalleryItemRequest>,
) -> ApiResult<PhotoGalleryItem> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.add_gallery_item(id, &request).await {
        Ok(item) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(item, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/gallery-items/:id - Remove a gallery item.
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_gallery_item(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

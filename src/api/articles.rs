//! Article API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Article, CreateArticleRequest, UpdateArticleRequest};
use crate::paging::{paginate, Page};
use crate::AppState;

/// Default and maximum page sizes for article listings.
const DEFAULT_PAGE_SIZE: usize = 12;
const MAX_PAGE_SIZE: usize = 100;

/// Paging parameters for the public article listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListQuery {
    /// Zero-based page index.
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// GET /api/articles - List published articles, paginated.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleListQuery>,
) -> ApiResult<Page<Article>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if query.page_size > MAX_PAGE_SIZE {
        return error(
            AppError::BadRequest(format!("pageSize must be at most {}", MAX_PAGE_SIZE)),
            revision_id,
        );
    }

    let articles = match state.repo.list_articles(true).await {
        Ok(articles) => articles,
        Err(e) => return error(e, revision_id),
    };

    match paginate(articles, query.page, query.page_size, |_| true) {
        Ok(page) => success(page, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/articles/:slug - Get a published article by slug.
pub async fn get_article_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Article> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_article_by_slug(&slug).await {
        Ok(Some(article)) if article.published => success(article, revision_id),
        Ok(_) => error(
            AppError::NotFound(format!("Article '{}' not found", slug)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/admin/articles - List all articles, drafts included.
pub async fn list_articles_admin(State(state): State<AppState>) -> ApiResult<Vec<Article>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_articles(false).await {
        Ok(articles) => success(articles, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/admin/articles/:id - Get any article by id.
pub async fn get_article(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Article> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_article(id).await {
        Ok(Some(article)) => success(article, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Article {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/articles - Create an article.
pub async fn create_article(
    State(state): State<AppState>,
    Json(request): Json<CreateArticleRequest>,
) -> ApiResult<Article> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_article(&request).await {
        Ok(article) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(article, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/articles/:id - Update an article.
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateArticleRequest>,
) -> ApiResult<Article> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_article(id, &request).await {
        Ok(article) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(article, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/articles/:id - Delete an article.
pub async fn delete_article(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_article(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

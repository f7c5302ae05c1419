//! Reader-facing post endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use shiftedblog_common::AppResult;
use shiftedblog_core::{ListFilter, PostDetail, PostListing};
use uuid::Uuid;

use crate::{extractors::PageParam, middleware::AppState, response::ApiResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/category/{name}/", get(list_by_category))
        .route("/tag/{slug}/", get(list_by_tag))
        .route("/drafts/{uuid}/", get(preview_post))
        .route("/{slug}/", get(show_post))
}

/// Newest published posts.
async fn list_posts(
    State(state): State<AppState>,
    PageParam(page): PageParam,
) -> AppResult<ApiResponse<PostListing>> {
    let listing = state
        .post_service
        .list_published(ListFilter::All, page)
        .await?;
    Ok(ApiResponse::ok(listing))
}

/// Published posts of a category.
async fn list_by_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
    PageParam(page): PageParam,
) -> AppResult<ApiResponse<PostListing>> {
    let listing = state
        .post_service
        .list_published(ListFilter::Category(name), page)
        .await?;
    Ok(ApiResponse::ok(listing))
}

/// Published posts with a tag.
async fn list_by_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    PageParam(page): PageParam,
) -> AppResult<ApiResponse<PostListing>> {
    let listing = state
        .post_service
        .list_published(ListFilter::Tag(slug), page)
        .await?;
    Ok(ApiResponse::ok(listing))
}

/// A published post.
async fn show_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<PostDetail>> {
    let detail = state.post_service.detail_by_slug(&slug).await?;
    Ok(ApiResponse::ok(detail))
}

/// Any post, by its secret preview key.
async fn preview_post(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> AppResult<ApiResponse<PostDetail>> {
    let detail = state.post_service.preview_by_uuid(uuid).await?;
    Ok(ApiResponse::ok(detail))
}

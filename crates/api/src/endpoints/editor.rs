//! Editor endpoints for posts, categories, series and galleries.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use shiftedblog_common::AppResult;
use shiftedblog_core::{
    AddGalleryImageInput, CreateCategoryInput, CreatePostInput, CreateSeriesInput, PlacePostInput,
    SetPositionInput, UpdatePostInput,
};
use shiftedblog_db::entities::{category, post, post_gallery_image, post_series, series};

use crate::{
    middleware::AppState,
    response::{ApiResponse, no_content},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/{id}", patch(update_post).delete(delete_post))
        .route("/posts/{id}/gallery", get(list_gallery).post(add_gallery_image))
        .route("/posts/{id}/gallery/{image_id}", delete(remove_gallery_image))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .route("/series", get(list_series).post(create_series))
        .route("/series/{id}", delete(delete_series))
        .route("/series/{id}/posts", get(list_placements).post(place_post))
        .route(
            "/series/{id}/posts/{placement_id}",
            patch(set_position).delete(remove_placement),
        )
}

// ==================== Posts ====================

async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<post::Model>> {
    let post = state.post_service.create(input).await?;
    Ok(ApiResponse::created(post))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<post::Model>> {
    let post = state.post_service.update(id, input).await?;
    Ok(ApiResponse::ok(post))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete(id).await?;
    Ok(no_content())
}

// ==================== Galleries ====================

async fn list_gallery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<post_gallery_image::Model>>> {
    let images = state.gallery_service.images_for_post(id).await?;
    Ok(ApiResponse::ok(images))
}

async fn add_gallery_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AddGalleryImageInput>,
) -> AppResult<ApiResponse<post_gallery_image::Model>> {
    let image = state.gallery_service.add_image(id, input).await?;
    Ok(ApiResponse::created(image))
}

async fn remove_gallery_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    state.gallery_service.remove_image(id, image_id).await?;
    Ok(no_content())
}

// ==================== Categories ====================

async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<category::Model>>> {
    let categories = state.post_service.categories().await?;
    Ok(ApiResponse::ok(categories))
}

async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<ApiResponse<category::Model>> {
    let category = state.post_service.create_category(input).await?;
    Ok(ApiResponse::created(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete_category(id).await?;
    Ok(no_content())
}

// ==================== Series ====================

async fn list_series(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<series::Model>>> {
    let series = state.series_service.list().await?;
    Ok(ApiResponse::ok(series))
}

async fn create_series(
    State(state): State<AppState>,
    Json(input): Json<CreateSeriesInput>,
) -> AppResult<ApiResponse<series::Model>> {
    let series = state.series_service.create_series(input).await?;
    Ok(ApiResponse::created(series))
}

async fn delete_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    state.series_service.delete_series(id).await?;
    Ok(no_content())
}

async fn list_placements(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<post_series::Model>>> {
    let placements = state.series_service.placements(id).await?;
    Ok(ApiResponse::ok(placements))
}

async fn place_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PlacePostInput>,
) -> AppResult<ApiResponse<post_series::Model>> {
    let placement = state.series_service.place_post(id, input).await?;
    Ok(ApiResponse::created(placement))
}

async fn set_position(
    State(state): State<AppState>,
    Path((id, placement_id)): Path<(i64, i64)>,
    Json(input): Json<SetPositionInput>,
) -> AppResult<ApiResponse<post_series::Model>> {
    let placement = state
        .series_service
        .set_position(id, placement_id, input)
        .await?;
    Ok(ApiResponse::ok(placement))
}

async fn remove_placement(
    State(state): State<AppState>,
    Path((id, placement_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    state.series_service.remove_post(id, placement_id).await?;
    Ok(no_content())
}

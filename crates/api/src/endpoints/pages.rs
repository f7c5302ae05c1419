//! Search, about page and crawler documents.

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use shiftedblog_common::AppResult;
use shiftedblog_core::{AboutPage, SearchResults, render_robots};

use crate::{
    extractors::{PageParam, SearchQuery},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search/", get(search))
        .route("/about/", get(about))
        .route("/robots.txt", get(robots_txt))
        .route("/sitemap.xml", get(sitemap_xml))
}

/// Full-text search over published posts.
async fn search(
    State(state): State<AppState>,
    SearchQuery(query): SearchQuery,
    PageParam(page): PageParam,
) -> AppResult<ApiResponse<SearchResults>> {
    let results = state.search_service.search(query.as_deref(), page).await?;
    Ok(ApiResponse::ok(results))
}

/// The about page.
async fn about(State(state): State<AppState>) -> AppResult<ApiResponse<AboutPage>> {
    let page = state.team_service.about().await?;
    Ok(ApiResponse::ok(page))
}

async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(state.config.site_url(), &state.config.site.admin_url),
    )
}

async fn sitemap_xml(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let xml = state
        .sitemap_service
        .sitemap(state.config.site_url())
        .await?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use shiftedblog_common::{AppError, Config, StorageBackend};
use shiftedblog_core::{
    GalleryService, MediaService, PostService, SearchService, SeriesService, SitemapService,
    TeamService,
};
use shiftedblog_db::repositories::{
    CategoryRepository, ContentTypeRepository, GalleryImageRepository, PostRepository,
    SeriesRepository, TagRepository, TeamRepository, UserRepository,
};
use tracing::warn;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub post_service: PostService,
    pub series_service: SeriesService,
    pub gallery_service: GalleryService,
    pub search_service: SearchService,
    pub team_service: TeamService,
    pub media_service: MediaService,
    pub sitemap_service: SitemapService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire repositories and services over a database connection.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: Config,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        let post_repo = PostRepository::new(Arc::clone(&db));
        let series_repo = SeriesRepository::new(Arc::clone(&db));
        let gallery_repo = GalleryImageRepository::new(Arc::clone(&db));

        let series_service = SeriesService::new(series_repo, post_repo.clone());
        let gallery_service = GalleryService::new(gallery_repo, post_repo.clone());
        let post_service = PostService::new(
            post_repo.clone(),
            CategoryRepository::new(Arc::clone(&db)),
            TagRepository::new(Arc::clone(&db)),
            ContentTypeRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            series_service.clone(),
            gallery_service.clone(),
        );

        Self {
            post_service,
            series_service,
            gallery_service,
            search_service: SearchService::new(post_repo.clone()),
            team_service: TeamService::new(TeamRepository::new(db)),
            media_service: MediaService::new(storage),
            sitemap_service: SitemapService::new(post_repo),
            config: Arc::new(config),
        }
    }
}

/// Reject requests for hosts the site does not serve.
pub async fn allowed_hosts_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !state.config.is_host_allowed(host) {
        warn!(host = %host, "Request for disallowed host");
        return AppError::BadRequest(format!("Invalid host: {host}")).into_response();
    }

    next.run(req).await
}

/// Require the editor bearer token.
///
/// Editor routes answer 404 when no token is configured or the token is blank.
pub async fn editor_auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let token = state.config.site.editor_token.as_deref();
    let Some(expected) = token.filter(|t| !t.trim().is_empty()) else {
        return AppError::NotFound("Editor API is disabled".to_string()).into_response();
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => {
            next.run(req).await
        }
        _ => AppError::Unauthorized.into_response(),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret!"));
    }
}

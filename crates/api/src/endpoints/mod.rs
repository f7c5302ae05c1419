//! API endpoints.

mod blog;
mod editor;
mod pages;
mod upload;

use axum::{Router, middleware::from_fn_with_state};

use crate::middleware::{AppState, allowed_hosts_middleware, editor_auth_middleware};
use crate::security::with_security_headers;

/// Create the application router.
///
/// The editor API is mounted under `/{admin_url}/api`. It and the image
/// upload endpoint require the editor token.
pub fn router(state: AppState) -> Router {
    let editor_path = format!("/{}/api", state.config.site.admin_url.trim_matches('/'));
    let editor_guard = from_fn_with_state(state.clone(), editor_auth_middleware);

    let router = Router::new()
        .merge(blog::router())
        .merge(pages::router())
        .merge(upload::router().route_layer(editor_guard.clone()))
        .nest(&editor_path, editor::router().route_layer(editor_guard))
        .layer(from_fn_with_state(state.clone(), allowed_hosts_middleware));

    with_security_headers(router, &state.config.security).with_state(state)
}

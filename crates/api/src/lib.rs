//! HTTP API layer for shiftedblog.
//!
//! - **Endpoints**: reader pages as JSON, crawler documents, image upload
//!   and the editor API
//! - **Extractors**: listing and search query parameters
//! - **Middleware**: host filtering and editor authentication
//! - **Security**: response security headers
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod security;

pub use endpoints::router;
pub use middleware::AppState;

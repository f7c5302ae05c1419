//! Image upload for the post editor.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use shiftedblog_common::AppError;
use tracing::debug;

use crate::middleware::AppState;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Form field holding the file.
const UPLOAD_FIELD: &str = "upload";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/custom-image-upload/", post(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

fn upload_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// Store an image and answer in the shape the editor's upload adapter reads.
async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(mut multipart) = multipart else {
        return upload_error("Invalid request");
    };

    let mut file: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Malformed upload");
                return upload_error("Invalid request");
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(ToString::to_string) else {
            continue;
        };
        match field.bytes().await {
            Ok(data) => file = Some((file_name, data.to_vec())),
            Err(e) => {
                debug!(error = %e, "Malformed upload");
                return upload_error("Invalid request");
            }
        }
    }

    let Some((file_name, data)) = file else {
        return upload_error("Invalid request");
    };

    match state.media_service.upload_image(&file_name, &data).await {
        Ok(uploaded) => Json(uploaded).into_response(),
        Err(AppError::UnsupportedFileType(_)) => upload_error("Unsupported file type"),
        Err(AppError::BadRequest(_)) => upload_error("Invalid request"),
        Err(e) => e.into_response(),
    }
}

//! Image uploads from the post editor.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shiftedblog_common::{AppError, AppResult, StorageBackend};
use tracing::info;

/// Extensions accepted for post images, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".tiff"];

/// Directory post images are stored under.
const POST_IMAGE_DIR: &str = "img/post";

/// Response body the editor's upload adapter expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub uploaded: u8,
    pub file_name: String,
    pub file_path: String,
}

/// Lowercased extension of a file name, with the dot.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

/// File name safe to store: directories dropped, spaces as underscores,
/// anything but letters, digits, `-`, `_` and `.` removed.
#[must_use]
pub fn storage_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();

    base.chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') => Some(c),
            _ => None,
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Service for uploaded media.
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn StorageBackend>,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Store an image uploaded from the editor.
    pub async fn upload_image(&self, file_name: &str, data: &[u8]) -> AppResult<UploadedImage> {
        self.upload_image_at(file_name, data, Utc::now()).await
    }

    /// Store an image under the directory for `at`.
    pub async fn upload_image_at(
        &self,
        file_name: &str,
        data: &[u8],
        at: DateTime<Utc>,
    ) -> AppResult<UploadedImage> {
        let extension = extension_of(file_name).unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::UnsupportedFileType(extension));
        }

        let name = storage_file_name(file_name);
        if extension_of(&name).as_deref() != Some(extension.as_str()) {
            return Err(AppError::BadRequest(format!("Invalid file name: {file_name}")));
        }

        let key = format!("{POST_IMAGE_DIR}/{}/{name}", at.format("%Y/%m/%d"));
        let stored = self.storage.save(&key, data).await?;

        info!(key = %stored.key, size = stored.size, "Image uploaded");

        Ok(UploadedImage {
            url: stored.url,
            uploaded: 1,
            file_name: name,
            file_path: stored.key,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shiftedblog_common::LocalStorage;

    fn temp_service() -> (MediaService, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "shiftedblog-media-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let storage = LocalStorage::new(dir.clone(), "/media".to_string());
        (MediaService::new(Arc::new(storage)), dir)
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Photo.JPG").as_deref(), Some(".jpg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of("README"), None);
    }

    #[test]
    fn test_storage_file_name() {
        assert_eq!(storage_file_name("../../my photo.png"), "my_photo.png");
        assert_eq!(storage_file_name("C:\\Users\\me\\cat (1).gif"), "cat_1.gif");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let (service, _) = temp_service();
        let result = service.upload_image("script.exe", b"MZ").await;
        assert!(matches!(result, Err(AppError::UnsupportedFileType(ext)) if ext == ".exe"));
    }

    #[tokio::test]
    async fn test_upload_uses_dated_path() {
        let (service, dir) = temp_service();
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();

        let uploaded = service
            .upload_image_at("Cover.PNG", b"png", at)
            .await
            .unwrap();

        assert_eq!(uploaded.file_path, "img/post/2024/03/07/Cover.PNG");
        assert_eq!(uploaded.url, "/media/img/post/2024/03/07/Cover.PNG");
        assert_eq!(uploaded.uploaded, 1);
        assert_eq!(uploaded.file_name, "Cover.PNG");

        tokio::fs::remove_dir_all(dir).await.ok();
    }
}

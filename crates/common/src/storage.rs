//! Storage abstraction for uploaded media.

use std::path::{Component, Path, PathBuf};

use crate::{AppError, AppResult};

/// Stored file metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Storage key (path relative to the media root).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a file under `key`.
    ///
    /// When the key is taken the backend picks a free variant and returns it.
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<UploadedFile>;

    /// Delete a file.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::BadRequest(format!("Invalid storage key: {key}")));
        }
        Ok(self.base_path.join(relative))
    }

    /// Find a key that is not taken yet by appending `_1`, `_2`, ... to the stem.
    async fn available_key(&self, key: &str) -> AppResult<String> {
        if !self.exists(key).await? {
            return Ok(key.to_string());
        }

        let (stem, ext) = match key.rsplit_once('.') {
            Some((stem, ext)) if !ext.contains('/') && !stem.ends_with('/') => {
                (stem, format!(".{ext}"))
            }
            _ => (key, String::new()),
        };

        let mut n = 1u32;
        loop {
            let candidate = format!("{stem}_{n}{ext}");
            if !self.exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<UploadedFile> {
        let key = self.available_key(key).await?;
        let path = self.resolve(&key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        tracing::debug!(key = %key, size = data.len(), "Stored uploaded file");

        Ok(UploadedFile {
            url: self.public_url(&key),
            size: data.len() as u64,
            key,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_storage() -> (LocalStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "shiftedblog-storage-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        (
            LocalStorage::new(dir.clone(), "/media/".to_string()),
            dir,
        )
    }

    #[test]
    fn test_public_url_trims_slash() {
        let storage = LocalStorage::new(PathBuf::from("/tmp"), "/media/".to_string());
        assert_eq!(
            storage.public_url("img/post/a.png"),
            "/media/img/post/a.png"
        );
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let (storage, _) = temp_storage();
        let result = storage.save("../etc/passwd", b"x").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_save_picks_free_name() {
        let (storage, dir) = temp_storage();

        let first = storage.save("img/post/photo.png", b"one").await.unwrap();
        let second = storage.save("img/post/photo.png", b"two").await.unwrap();

        assert_eq!(first.key, "img/post/photo.png");
        assert_eq!(second.key, "img/post/photo_1.png");
        assert_eq!(second.size, 3);
        assert!(storage.exists("img/post/photo_1.png").await.unwrap());

        tokio::fs::remove_dir_all(dir).await.ok();
    }
}

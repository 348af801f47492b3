//! Local disk storage for uploaded images.
//!
//! Files land in the configured upload directory under a random name and are
//! served back under `/uploads/<name>`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::{MAX_UPLOAD_BYTES, UPLOADS_URL_PREFIX};
use crate::errors::{AppError, AppResult};

/// A file written to the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Public URL path, e.g. `/uploads/3f2a...c1.jpg`
    pub url: String,
}

/// Writes uploaded files under a single directory
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `bytes`, keeping the extension of `original_name` when it is sane.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> AppResult<StoredFile> {
        if bytes.is_empty() {
            return Err(AppError::bad_request("Uploaded file is empty"));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::bad_request(format!(
                "Uploaded file exceeds {} bytes",
                MAX_UPLOAD_BYTES
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::internal(format!("Cannot create upload directory: {}", e))
        })?;

        let name = match original_name.and_then(extension_of) {
            Some(ext) => format!("{}.{}", Uuid::new_v4().simple(), ext),
            None => Uuid::new_v4().simple().to_string(),
        };
        let path = self.dir.join(&name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("Cannot store upload: {}", e)))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Upload stored");

        Ok(StoredFile {
            path,
            url: format!("{}/{}", UPLOADS_URL_PREFIX, name),
        })
    }

    /// Remove a file written by [`UploadStore::save`] whose request was then rejected.
    pub async fn discard(&self, url: &str) {
        let Some(name) = url
            .strip_prefix(UPLOADS_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return;
        };
        if name.is_empty() || name.contains(['/', '\\']) {
            return;
        }

        let path = self.dir.join(name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to discard upload");
        }
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("evil.p/hp"), None);
    }

    #[tokio::test]
    async fn test_save_writes_file_and_builds_url() {
        let dir = std::env::temp_dir().join(format!("door-elite-test-{}", Uuid::new_v4()));
        let store = UploadStore::new(&dir);

        let stored = store.save(Some("avatar.png"), b"\x89PNG").await.unwrap();

        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.url.ends_with(".png"));
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"\x89PNG");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_discard_removes_only_stored_files() {
        let dir = std::env::temp_dir().join(format!("door-elite-test-{}", Uuid::new_v4()));
        let store = UploadStore::new(&dir);
        let stored = store.save(Some("service.jpg"), b"jpeg").await.unwrap();

        store.discard("/images/default-service.jpg").await;
        store.discard("/uploads/../secret").await;
        assert!(stored.path.exists());

        store.discard(&stored.url).await;
        assert!(!stored.path.exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_save_rejects_empty_file() {
        let store = UploadStore::new(std::env::temp_dir());
        let result = store.save(Some("empty.png"), &[]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}

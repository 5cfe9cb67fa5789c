//! Local filesystem storage for uploaded images.
//!
//! Uploads are validated (MIME allow-list, size ceiling) before anything is
//! written; accepted files land in the upload directory under a generated
//! collision-resistant name and are served back under the configured public
//! path prefix.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::config::UploadConfig;

/// Image MIME types accepted for project uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload size ceiling: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unsupported image type: {0} (allowed: jpeg, png, gif, webp)")]
    UnsupportedMediaType(String),
    #[error("File too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: usize, max: usize },
    #[error("Storage IO error: {0}")]
    Io(String),
    #[error("Storage configuration error: {0}")]
    ConfigError(String),
}

#[derive(Debug, Clone)]
pub struct LocalStorageService {
    pub config: UploadConfig,
}

impl LocalStorageService {
    /// Create the storage service, making sure the upload directory exists.
    #[instrument(skip(config), fields(upload_dir = %config.upload_dir))]
    pub fn new(config: UploadConfig) -> Result<Self, StorageError> {
        config
            .validate()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        std::fs::create_dir_all(&config.upload_dir).map_err(|e| {
            error!("Failed to create upload directory: {}", e);
            StorageError::Io(format!("Failed to create upload directory: {}", e))
        })?;
        info!("Local storage initialized at {}", config.upload_dir);
        Ok(LocalStorageService { config })
    }

    /// Reject disallowed MIME types and oversized payloads. Runs before any
    /// write and before a Project document is constructed.
    pub fn validate(content_type: &str, size: usize) -> Result<(), StorageError> {
        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            return Err(StorageError::UnsupportedMediaType(content_type.to_string()));
        }
        if size > MAX_UPLOAD_BYTES {
            return Err(StorageError::FileTooLarge {
                size,
                max: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }

    /// Generated name: millisecond timestamp prefix plus a random suffix,
    /// original extension preserved.
    pub fn generate_filename(original: &str) -> String {
        let extension = Path::new(original)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();
        format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        )
    }

    /// Validate and persist an uploaded image, returning the public path it
    /// will be served under.
    #[instrument(skip(self, content), fields(filename = %original_filename, content_type = %content_type, size = content.len()))]
    pub async fn save_image(
        &self,
        original_filename: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        Self::validate(content_type, content.len())?;

        let filename = Self::generate_filename(original_filename);
        let path = PathBuf::from(&self.config.upload_dir).join(&filename);
        debug!("Writing uploaded image to {}", path.display());

        tokio::fs::write(&path, content).await.map_err(|e| {
            error!("Failed to write uploaded image: {}", e);
            StorageError::Io(format!("Failed to write uploaded image: {}", e))
        })?;

        info!("Stored uploaded image as {}", filename);
        Ok(format!("{}/{}", self.config.public_path, filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_allowed_types() {
        for content_type in ALLOWED_IMAGE_TYPES {
            assert!(LocalStorageService::validate(content_type, 1024).is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_disallowed_types() {
        for content_type in ["image/svg+xml", "application/pdf", "text/html", "video/mp4"] {
            assert!(matches!(
                LocalStorageService::validate(content_type, 1024),
                Err(StorageError::UnsupportedMediaType(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_oversized_files() {
        assert!(LocalStorageService::validate("image/png", MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            LocalStorageService::validate("image/png", MAX_UPLOAD_BYTES + 1),
            Err(StorageError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_generate_filename_preserves_extension() {
        let name = LocalStorageService::generate_filename("My Painting.JPG");
        assert!(name.ends_with(".jpg"));
        assert!(!name.contains(' '));
    }

    #[test]
    fn test_generate_filename_without_extension() {
        let name = LocalStorageService::generate_filename("raw");
        assert!(!name.contains('.'));
        assert!(!name.is_empty());
    }

    #[test]
    fn test_generated_filenames_differ() {
        let a = LocalStorageService::generate_filename("a.png");
        let b = LocalStorageService::generate_filename("a.png");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_save_image_writes_file_and_returns_public_path() {
        let dir = std::env::temp_dir().join(format!("galerya-storage-{}", Uuid::new_v4()));
        let config = UploadConfig {
            upload_dir: dir.to_string_lossy().to_string(),
            public_path: "/uploads".to_string(),
        };
        let storage = LocalStorageService::new(config).unwrap();

        let public_path = storage
            .save_image("sunset.jpg", "image/jpeg", b"not-really-a-jpeg")
            .await
            .unwrap();
        assert!(public_path.starts_with("/uploads/"));
        assert!(public_path.ends_with(".jpg"));

        let filename = public_path.rsplit('/').next().unwrap();
        let on_disk = dir.join(filename);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"not-really-a-jpeg");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_save_image_rejects_before_writing() {
        let dir = std::env::temp_dir().join(format!("galerya-storage-{}", Uuid::new_v4()));
        let config = UploadConfig {
            upload_dir: dir.to_string_lossy().to_string(),
            public_path: "/uploads".to_string(),
        };
        let storage = LocalStorageService::new(config).unwrap();

        let result = storage
            .save_image("notes.txt", "text/plain", b"hello")
            .await;
        assert!(result.is_err());
        // Nothing may land on disk for a rejected upload
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! Profile photo uploads
//!
//! Checks an uploaded part is an image within the size limit and stores it
//! under `users/user-<id>-<timestamp>.<ext>`.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use mm_core::config::StorageConfig;
use mm_core::error::MmError;
use thiserror::Error;

use crate::storage::{guess_content_type, FileMetadata, Storage, StorageError};

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Not an image! please upload only images")]
    NotAnImage,
    #[error("Photo is too large (maximum {max} bytes)")]
    TooLarge { max: usize },
    #[error("Please upload a photo")]
    Empty,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<PhotoError> for MmError {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::Storage(e) => MmError::Storage(e.to_string()),
            other => MmError::bad_request(other.to_string()),
        }
    }
}

/// An uploaded file part
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Declared content type of the part, if any
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub data: Bytes,
}

impl PhotoUpload {
    pub fn new(content_type: Option<String>, file_name: Option<String>, data: Bytes) -> Self {
        Self {
            content_type,
            file_name,
            data,
        }
    }

    /// Declared content type, or one guessed from the file name
    pub fn effective_content_type(&self) -> Option<String> {
        self.content_type
            .clone()
            .filter(|ct| !ct.trim().is_empty())
            .or_else(|| self.file_name.as_deref().map(guess_content_type))
    }
}

/// A stored photo
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub key: String,
    pub metadata: FileMetadata,
}

/// Upload rules
#[derive(Debug, Clone, Copy)]
pub struct PhotoPolicy {
    pub max_size: usize,
}

impl PhotoPolicy {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.max_photo_size)
    }

    /// Validate an upload, returning the file extension to store it with
    pub fn validate(&self, upload: &PhotoUpload) -> Result<String, PhotoError> {
        let content_type = upload
            .effective_content_type()
            .ok_or(PhotoError::NotAnImage)?;
        if !content_type.starts_with("image") {
            return Err(PhotoError::NotAnImage);
        }
        if upload.data.is_empty() {
            return Err(PhotoError::Empty);
        }
        if upload.data.len() > self.max_size {
            return Err(PhotoError::TooLarge { max: self.max_size });
        }
        Ok(extension_for(&content_type))
    }

    /// Validate and store a user's photo
    pub async fn store(
        &self,
        storage: &dyn Storage,
        user_id: &str,
        upload: PhotoUpload,
        now: DateTime<Utc>,
    ) -> Result<StoredPhoto, PhotoError> {
        let ext = self.validate(&upload)?;
        let key = photo_key(user_id, now, &ext);
        let metadata = storage.put(&key, upload.data).await?;

        tracing::info!(key = %key, size = metadata.size, storage = storage.name(), "photo stored");
        Ok(StoredPhoto { key, metadata })
    }
}

/// Extension from the content subtype (`image/png` -> `png`)
fn extension_for(content_type: &str) -> String {
    let subtype = content_type
        .split('/')
        .nth(1)
        .unwrap_or("")
        .split(|c: char| c == ';' || c == '+')
        .next()
        .unwrap_or("")
        .trim();
    let ext: String = subtype
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() {
        "img".to_string()
    } else {
        ext
    }
}

fn key_prefix(user_id: &str) -> String {
    let safe_id: String = user_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!("users/user-{}-", safe_id)
}

/// Storage key for a user's photo
pub fn photo_key(user_id: &str, now: DateTime<Utc>, ext: &str) -> String {
    format!("{}{}.{}", key_prefix(user_id), now.timestamp_millis(), ext)
}

/// Whether `key` has the shape of a photo key issued to `user_id`
pub fn is_photo_key_of(user_id: &str, key: &str) -> bool {
    let Some(rest) = key.strip_prefix(&key_prefix(user_id)) else {
        return false;
    };
    match rest.split_once('.') {
        Some((millis, ext)) => {
            !millis.is_empty()
                && millis.chars().all(|c| c.is_ascii_digit())
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn upload(content_type: Option<&str>, data: &'static [u8]) -> PhotoUpload {
        PhotoUpload::new(content_type.map(str::to_string), None, Bytes::from_static(data))
    }

    #[test]
    fn test_rejects_non_images() {
        let policy = PhotoPolicy::new(1024);
        let err = policy
            .validate(&upload(Some("application/pdf"), b"%PDF"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Not an image! please upload only images");
        assert!(policy.validate(&upload(None, b"data")).is_err());
    }

    #[test]
    fn test_size_limits() {
        let policy = PhotoPolicy::new(4);
        assert!(matches!(
            policy.validate(&upload(Some("image/png"), b"12345")),
            Err(PhotoError::TooLarge { max: 4 })
        ));
        assert!(matches!(
            policy.validate(&upload(Some("image/png"), b"")),
            Err(PhotoError::Empty)
        ));
        assert_eq!(policy.validate(&upload(Some("image/png"), b"1234")).unwrap(), "png");
    }

    #[test]
    fn test_content_type_from_file_name() {
        let upload = PhotoUpload::new(None, Some("me.jpg".into()), Bytes::from_static(b"x"));
        assert_eq!(upload.effective_content_type().as_deref(), Some("image/jpeg"));
        assert_eq!(PhotoPolicy::new(10).validate(&upload).unwrap(), "jpeg");
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/svg+xml"), "svg");
        assert_eq!(extension_for("image/jpeg; charset=binary"), "jpeg");
        assert_eq!(extension_for("image"), "img");
    }

    #[test]
    fn test_photo_key() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(photo_key("abc123", now, "png"), "users/user-abc123-1704067200000.png");
        assert_eq!(photo_key("../x", now, "png"), "users/user-x-1704067200000.png");
    }

    #[test]
    fn test_is_photo_key_of() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(is_photo_key_of("abc", &photo_key("abc", now, "png")));
        assert!(!is_photo_key_of("ab", &photo_key("abc", now, "png")));
        assert!(!is_photo_key_of("abc", &photo_key("abc-1", now, "png")));
        assert!(!is_photo_key_of("abc", "users/user-abc-123"));
        assert!(!is_photo_key_of("abc", "users/user-abc-1.png/../../other"));
    }

    #[tokio::test]
    async fn test_store() {
        let storage = MemoryStorage::new();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stored = PhotoPolicy::new(1024)
            .store(&storage, "u1", upload(Some("image/png"), b"png-bytes"), now)
            .await
            .unwrap();

        assert_eq!(stored.key, "users/user-u1-1704067200000.png");
        assert_eq!(stored.metadata.size, 9);
        assert_eq!(storage.keys().await, vec![stored.key.clone()]);
    }

    #[test]
    fn test_error_mapping() {
        let err: MmError = PhotoError::NotAnImage.into();
        assert_eq!(err.status_code(), 400);
        let err: MmError = PhotoError::Storage(StorageError::NotFound("k".into())).into();
        assert_eq!(err.status_code(), 500);
    }
}

//! # mm-photos
//!
//! Profile photo storage for Mentor Match.
//!
//! ## Features
//!
//! - Storage abstraction (local filesystem, memory)
//! - Upload validation (images only, size limit)
//! - Per-user photo keys
//!
//! Image processing (resizing, format conversion) is out of scope; photos
//! are stored as uploaded.

pub mod storage;
pub mod upload;

pub use storage::{
    calculate_digest, guess_content_type, FileMetadata, LocalStorage, MemoryStorage, Storage,
    StorageError, StorageResult,
};
pub use upload::{
    is_photo_key_of, photo_key, PhotoError, PhotoPolicy, PhotoUpload, StoredPhoto,
};

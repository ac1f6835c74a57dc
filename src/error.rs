//! Photo Gallery - Error Types

use thiserror::Error;

/// Result type for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Failures reported by a [`Camera`](crate::camera::Camera)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Capture cancelled by user")]
    Cancelled,

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera available: {0}")]
    NoCamera(String),

    #[error("Captured image unreadable: {0}")]
    Unreadable(String),
}

/// Failures reported by a [`FileStore`](crate::storage::FileStore)
#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Storage full")]
    StorageFull,

    #[error("IO error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    pub(crate) fn io(name: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound(name.to_string()),
            std::io::ErrorKind::StorageFull => FileError::StorageFull,
            _ => FileError::Io {
                name: name.to_string(),
                source,
            },
        }
    }
}

/// Failures reported by a [`KeyValueStore`](crate::storage::KeyValueStore)
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

/// Gallery error types
#[derive(Error, Debug)]
pub enum GalleryError {
    // ═══════════════════════════════════════════════════════════════
    // COLLABORATOR ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("File store error: {0}")]
    File(#[from] FileError),

    #[error("Key-value store error: {0}")]
    Storage(#[from] StorageError),

    // ═══════════════════════════════════════════════════════════════
    // INDEX ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Malformed photo index: {0}")]
    Serialization(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════
    // GALLERY ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Gallery not initialized - call initialize() first")]
    NotInitialized,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No file names left after stamp {0}")]
    NamesExhausted(i64),
}

impl GalleryError {
    /// The user backed out of the camera UI; callers usually stay silent
    pub fn is_user_cancellation(&self) -> bool {
        matches!(self, GalleryError::Capture(CaptureError::Cancelled))
    }

    /// Check if retrying the same operation can succeed without user action
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GalleryError::Capture(CaptureError::Cancelled)
                | GalleryError::File(FileError::Io { .. })
                | GalleryError::Storage(_)
                | GalleryError::NotInitialized
        )
    }
}

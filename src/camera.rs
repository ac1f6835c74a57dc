//! Photo Gallery - Capture Adapter
//!
//! The gallery never talks to camera hardware. It asks a [`Camera`] for a
//! transient reference to new image data and then resolves that reference
//! to bytes before persisting them.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// Where the camera should take the image from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraSource {
    /// Let the user choose
    Prompt,
    Camera,
    Photos,
}

/// How the camera hands back the captured image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFormat {
    /// A reference to the bytes, resolved later
    Uri,
    Base64,
    DataUrl,
}

/// Options passed on every capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// JPEG quality, 0-100
    pub quality: u8,
    pub source: CameraSource,
    pub result_format: ResultFormat,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: 100,
            source: CameraSource::Camera,
            result_format: ResultFormat::Uri,
        }
    }
}

/// Result of a successful capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Transient, session-local reference to the captured bytes
    pub web_path: String,
    /// Image format reported by the camera (e.g. "jpeg")
    pub format: String,
}

/// Capture Adapter
#[async_trait]
pub trait Camera: Send + Sync {
    /// Obtain new image data. May wait indefinitely on user interaction.
    async fn capture(&self, options: &CaptureOptions) -> Result<CapturedImage, CaptureError>;

    /// Resolve a captured image's transient reference to its bytes
    async fn read_bytes(&self, image: &CapturedImage) -> Result<Vec<u8>, CaptureError>;
}

/// Camera that "captures" by importing queued image files from disk
pub struct FileCamera {
    pending: Mutex<VecDeque<PathBuf>>,
}

impl FileCamera {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a file to be returned by the next capture
    pub fn queue(&self, source: impl Into<PathBuf>) {
        self.pending.lock().push_back(source.into());
    }

    /// Number of queued files
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    fn format_of(path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "jpeg".into())
    }
}

impl Default for FileCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn capture(&self, options: &CaptureOptions) -> Result<CapturedImage, CaptureError> {
        // Nothing queued is the file equivalent of closing the camera UI
        let source = self.pending.lock().pop_front().ok_or(CaptureError::Cancelled)?;

        log::debug!(
            "Importing {} (source {:?}, quality {})",
            source.display(),
            options.source,
            options.quality
        );

        let absolute = tokio::fs::canonicalize(&source)
            .await
            .map_err(|e| CaptureError::Unreadable(format!("{}: {}", source.display(), e)))?;

        Ok(CapturedImage {
            web_path: format!("file://{}", absolute.display()),
            format: Self::format_of(&absolute),
        })
    }

    async fn read_bytes(&self, image: &CapturedImage) -> Result<Vec<u8>, CaptureError> {
        let path = image
            .web_path
            .strip_prefix("file://")
            .ok_or_else(|| CaptureError::Unreadable(format!("not a file reference: {}", image.web_path)))?;

        tokio::fs::read(path)
            .await
            .map_err(|e| CaptureError::Unreadable(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_camera_imports_queued_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("IMG_0001.JPG");
        std::fs::write(&source, b"\xFF\xD8\xFFpixels").unwrap();

        let camera = FileCamera::new();
        camera.queue(&source);
        assert_eq!(camera.pending(), 1);

        let image = camera.capture(&CaptureOptions::default()).await.unwrap();
        assert!(image.web_path.starts_with("file://"));
        assert_eq!(image.format, "jpg");
        assert_eq!(camera.pending(), 0);

        let bytes = camera.read_bytes(&image).await.unwrap();
        assert_eq!(bytes, b"\xFF\xD8\xFFpixels");
    }

    #[tokio::test]
    async fn test_file_camera_without_queue_is_cancelled() {
        let camera = FileCamera::new();
        let err = camera.capture(&CaptureOptions::default()).await.unwrap_err();
        assert_eq!(err, CaptureError::Cancelled);
    }

    #[tokio::test]
    async fn test_file_camera_missing_source() {
        let dir = tempdir().unwrap();
        let camera = FileCamera::new();
        camera.queue(dir.path().join("nope.jpeg"));

        let err = camera.capture(&CaptureOptions::default()).await.unwrap_err();
        assert!(matches!(err, CaptureError::Unreadable(_)));
    }
}

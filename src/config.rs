//! Photo Gallery - Configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::CaptureOptions;
use crate::error::{GalleryError, GalleryResult};
use crate::storage::Directory;

/// Key the index is stored under
pub const DEFAULT_INDEX_KEY: &str = "photos";

/// What `initialize()` does when an indexed photo has no backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFilePolicy {
    /// Abort the whole load with the file store error
    Fail,
    /// Keep the entry without inline content
    #[default]
    KeepWithoutContent,
    /// Drop the entry from the rehydrated collection
    Skip,
}

/// Gallery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Key-value store key holding the index
    pub index_key: String,
    /// Extension for generated file names
    pub file_extension: String,
    /// MIME type used when the content cannot be sniffed
    pub default_mime: String,
    /// File store location class for photo files
    pub directory: Directory,
    /// Rehydration behavior for missing files
    pub missing_file_policy: MissingFilePolicy,
    /// Options passed to the camera on every capture
    pub capture: CaptureOptions,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            index_key: DEFAULT_INDEX_KEY.into(),
            file_extension: "jpeg".into(),
            default_mime: "image/jpeg".into(),
            directory: Directory::Data,
            missing_file_policy: MissingFilePolicy::default(),
            capture: CaptureOptions::default(),
        }
    }
}

impl GalleryConfig {
    /// Load configuration from a JSON file; omitted fields take defaults
    pub fn load(path: &Path) -> GalleryResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GalleryError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| GalleryError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce unusable keys or file names
    pub fn validate(&self) -> GalleryResult<()> {
        if self.index_key.trim().is_empty() {
            return Err(GalleryError::Config("index_key must not be empty".into()));
        }

        let ext = &self.file_extension;
        if ext.is_empty() || ext.contains(|c| matches!(c, '/' | '\\' | '.')) {
            return Err(GalleryError::Config(format!(
                "invalid file_extension: {:?}",
                ext
            )));
        }

        if self.capture.quality > 100 {
            return Err(GalleryError::Config(format!(
                "capture quality must be 0-100, got {}",
                self.capture.quality
            )));
        }

        Ok(())
    }
}

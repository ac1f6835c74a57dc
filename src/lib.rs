//! # Photo Gallery
//!
//! Observable photo collection kept in step with a persisted index and a
//! device-local file store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     PHOTO GALLERY                        │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌────────────┐  │
//! │  │   CAMERA    │─►│  GALLERY STATE   │─►│ SUBSCRIBERS│  │
//! │  │  (capture)  │  │  MANAGER (watch) │  │  (render)  │  │
//! │  └─────────────┘  └────────┬─────────┘  └────────────┘  │
//! │                            │                             │
//! │  ┌─────────────────────────┴──────────────────────────┐  │
//! │  │                PERSISTENCE GATEWAY                  │  │
//! │  │   FileStore: photo bytes   KeyValueStore: index     │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Model
//!
//! - Photo bytes live only in the file store, keyed by `filepath`
//! - The index is a JSON array of `{filepath, displayReference?}` under `"photos"`
//! - Inline `data:` URIs are attached on load and never written back
//! - The photo file is always written before the index that names it

pub mod camera;
pub mod config;
pub mod error;
pub mod gallery;
pub mod naming;
pub mod photo;
pub mod storage;

pub use camera::{Camera, CameraSource, CaptureOptions, CapturedImage, FileCamera, ResultFormat};
pub use config::{GalleryConfig, MissingFilePolicy, DEFAULT_INDEX_KEY};
pub use error::{CaptureError, FileError, GalleryError, GalleryResult, StorageError};
pub use gallery::{CaptureStage, PhotoGallery, PhotoSnapshot};
pub use photo::{IndexEntry, PhotoRecord};
pub use storage::{DataDirectory, Directory, FileStore, KeyValueStore, MemoryFiles, MemoryStore, SqliteStore};

/// Photo Gallery version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

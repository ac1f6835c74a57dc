//! Photo Gallery - Gallery State Manager
//!
//! Owns the in-memory photo collection and keeps it consistent with the
//! persisted index and the photo files.
//!
//! ```text
//! initialize():    kv.get(index) ──► files.read(each) ──► publish
//! capture_photo(): camera ──► files.write ──► publish (prepend) ──► kv.set(index)
//! ```
//!
//! Both operations run under one writer lock, so a capture always starts from
//! the collection left by the previous one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};

use crate::camera::Camera;
use crate::config::{GalleryConfig, MissingFilePolicy};
use crate::error::{FileError, GalleryError, GalleryResult};
use crate::naming::FileNamer;
use crate::photo::{data_uri, decode_index, encode_index, PhotoRecord};
use crate::storage::{FileStore, KeyValueStore};

/// Immutable view of the collection, newest first
pub type PhotoSnapshot = Arc<[PhotoRecord]>;

/// Progress of the capture in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    Idle,
    /// Waiting on the camera
    Capturing,
    /// Writing the photo file
    Saving,
    /// Writing the index
    Indexing,
}

/// Moves the stage forward; drops back to `Idle` however the capture ends
struct StageGuard<'a> {
    stage: &'a RwLock<CaptureStage>,
}

impl<'a> StageGuard<'a> {
    fn enter(stage: &'a RwLock<CaptureStage>) -> Self {
        *stage.write() = CaptureStage::Capturing;
        Self { stage }
    }

    fn advance(&self, next: CaptureStage) {
        log::debug!("Capture stage: {:?}", next);
        *self.stage.write() = next;
    }
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        *self.stage.write() = CaptureStage::Idle;
    }
}

/// Gallery State Manager
pub struct PhotoGallery {
    camera: Arc<dyn Camera>,
    files: Arc<dyn FileStore>,
    kv: Arc<dyn KeyValueStore>,
    config: GalleryConfig,
    namer: FileNamer,
    /// Serializes every read-modify-write of collection and index
    writer: Mutex<()>,
    photos: watch::Sender<PhotoSnapshot>,
    stage: RwLock<CaptureStage>,
    initialized: AtomicBool,
}

impl PhotoGallery {
    pub fn new(
        camera: Arc<dyn Camera>,
        files: Arc<dyn FileStore>,
        kv: Arc<dyn KeyValueStore>,
        config: GalleryConfig,
    ) -> GalleryResult<Self> {
        config.validate()?;

        let namer = FileNamer::new(&config.file_extension);
        let (photos, _) = watch::channel(PhotoSnapshot::from(Vec::new()));

        Ok(Self {
            camera,
            files,
            kv,
            config,
            namer,
            writer: Mutex::new(()),
            photos,
            stage: RwLock::new(CaptureStage::Idle),
            initialized: AtomicBool::new(false),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // READ-ONLY PROJECTION
    // ═══════════════════════════════════════════════════════════════════════

    /// Current collection, newest first
    pub fn photos(&self) -> PhotoSnapshot {
        self.photos.borrow().clone()
    }

    /// Receiver that sees a new snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<PhotoSnapshot> {
        self.photos.subscribe()
    }

    pub fn len(&self) -> usize {
        self.photos.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.borrow().is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn capture_stage(&self) -> CaptureStage {
        *self.stage.read()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Load the index and attach each photo's content.
    ///
    /// On error the collection keeps whatever it held before the call.
    pub async fn initialize(&self) -> GalleryResult<()> {
        let _writer = self.writer.lock().await;

        let key = &self.config.index_key;
        // A blank value is treated the same as no index at all
        let entries = match self.kv.get(key).await? {
            Some(raw) if !raw.trim().is_empty() => decode_index(&raw)?,
            _ => Vec::new(),
        };
        log::info!("Rehydrating {} photos from index '{}'", entries.len(), key);

        let mut photos = Vec::with_capacity(entries.len());
        let mut missing = 0usize;

        for entry in entries {
            self.namer.observe(&entry.filepath);

            let content = match self.files.read(&entry.filepath, self.config.directory).await {
                Ok(bytes) => Some(data_uri(&bytes, &self.config.default_mime)),
                Err(FileError::NotFound(name)) => {
                    missing += 1;
                    match self.config.missing_file_policy {
                        MissingFilePolicy::Fail => {
                            return Err(FileError::NotFound(name).into());
                        }
                        MissingFilePolicy::KeepWithoutContent => {
                            log::warn!("Photo file missing, keeping entry without content: {}", name);
                            None
                        }
                        MissingFilePolicy::Skip => {
                            log::warn!("Photo file missing, skipping entry: {}", name);
                            continue;
                        }
                    }
                }
                Err(e) => return Err(e.into()),
            };

            photos.push(PhotoRecord::rehydrated(entry, content));
        }

        log::info!(
            "Gallery loaded: {} photos, {} missing files",
            photos.len(),
            missing
        );

        self.photos.send_replace(PhotoSnapshot::from(photos));
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    /// Take a photo, store it, show it first, and update the index.
    ///
    /// The photo file is written before the index, so the index never names
    /// a file that does not exist. If the index write fails the new photo
    /// stays visible in memory and the error is returned.
    pub async fn capture_photo(&self) -> GalleryResult<PhotoRecord> {
        let _writer = self.writer.lock().await;

        if !self.is_initialized() {
            return Err(GalleryError::NotInitialized);
        }

        let stage = StageGuard::enter(&self.stage);

        let image = match self.camera.capture(&self.config.capture).await {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Capture failed: {}", e);
                return Err(e.into());
            }
        };
        let bytes = self.camera.read_bytes(&image).await?;

        stage.advance(CaptureStage::Saving);
        let filepath = self.namer.next_name()?;
        self.files
            .write(&filepath, &bytes, self.config.directory)
            .await?;

        let record = PhotoRecord::captured(filepath, image.web_path);

        stage.advance(CaptureStage::Indexing);
        let current = self.photos();
        let mut updated = Vec::with_capacity(current.len() + 1);
        updated.push(record.clone());
        updated.extend(current.iter().cloned());
        self.photos.send_replace(PhotoSnapshot::from(updated));

        let index = encode_index(&self.photos())?;
        self.kv.set(&self.config.index_key, &index).await?;

        log::info!(
            "Captured {} ({} bytes, {})",
            record.filepath,
            bytes.len(),
            image.format
        );
        Ok(record)
    }
}

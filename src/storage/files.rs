//! Photo Gallery - File Store
//!
//! Reads and writes photo bytes by logical name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::FileError;

/// Location class a file is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directory {
    /// Private application data, kept until the app is removed
    Data,
    /// May be purged by the platform
    Cache,
    /// User-visible documents
    Documents,
}

impl Directory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directory::Data => "data",
            Directory::Cache => "cache",
            Directory::Documents => "documents",
        }
    }
}

/// Binary file storage addressed by name
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn write(&self, name: &str, bytes: &[u8], directory: Directory) -> Result<(), FileError>;

    async fn read(&self, name: &str, directory: Directory) -> Result<Vec<u8>, FileError>;

    async fn exists(&self, name: &str, directory: Directory) -> Result<bool, FileError>;
}

/// Names are flat: no separators, no parent references
fn check_name(name: &str) -> Result<(), FileError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c| matches!(c, '/' | '\\' | '\0'))
    {
        return Err(FileError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// File store rooted at a directory on disk
pub struct DataDirectory {
    /// Root directory
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Directory holding files of one location class
    pub fn location(&self, directory: Directory) -> PathBuf {
        self.root.join(directory.as_str())
    }

    /// Get full path for a name in a location class
    fn full_path(&self, name: &str, directory: Directory) -> Result<PathBuf, FileError> {
        check_name(name)?;
        Ok(self.location(directory).join(name))
    }
}

#[async_trait]
impl FileStore for DataDirectory {
    /// Write file atomically
    async fn write(&self, name: &str, bytes: &[u8], directory: Directory) -> Result<(), FileError> {
        let path = self.full_path(name, directory)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::io(name, e))?;
        }

        // Write to temp file first, then rename over the target
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let written = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(e) = written {
            // Leave no partial temp file behind
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(FileError::io(name, e));
        }

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn read(&self, name: &str, directory: Directory) -> Result<Vec<u8>, FileError> {
        let path = self.full_path(name, directory)?;
        tokio::fs::read(&path).await.map_err(|e| FileError::io(name, e))
    }

    async fn exists(&self, name: &str, directory: Directory) -> Result<bool, FileError> {
        let path = self.full_path(name, directory)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| FileError::io(name, e))
    }
}

/// In-memory file store
#[derive(Default)]
pub struct MemoryFiles {
    files: Mutex<HashMap<(Directory, String), Vec<u8>>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files across all location classes
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }

    /// Drop a file, returning whether it existed
    pub fn remove(&self, name: &str, directory: Directory) -> bool {
        self.files
            .lock()
            .remove(&(directory, name.to_string()))
            .is_some()
    }
}

#[async_trait]
impl FileStore for MemoryFiles {
    async fn write(&self, name: &str, bytes: &[u8], directory: Directory) -> Result<(), FileError> {
        check_name(name)?;
        self.files
            .lock()
            .insert((directory, name.to_string()), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, name: &str, directory: Directory) -> Result<Vec<u8>, FileError> {
        check_name(name)?;
        self.files
            .lock()
            .get(&(directory, name.to_string()))
            .cloned()
            .ok_or_else(|| FileError::NotFound(name.to_string()))
    }

    async fn exists(&self, name: &str, directory: Directory) -> Result<bool, FileError> {
        check_name(name)?;
        Ok(self.files.lock().contains_key(&(directory, name.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_data_directory() {
        let dir = tempdir().unwrap();
        let fs = DataDirectory::new(dir.path());
        assert_eq!(fs.location(Directory::Cache), dir.path().join("cache"));

        fs.write("1700000000000.jpeg", b"image bytes", Directory::Data)
            .await
            .unwrap();
        assert!(fs.exists("1700000000000.jpeg", Directory::Data).await.unwrap());
        assert!(!fs.exists("1700000000000.jpeg", Directory::Cache).await.unwrap());
        assert!(dir.path().join("data").join("1700000000000.jpeg").is_file());
        assert!(!dir.path().join("data").join("1700000000000.jpeg.tmp").exists());

        let data = fs.read("1700000000000.jpeg", Directory::Data).await.unwrap();
        assert_eq!(data, b"image bytes");

        // Overwrite replaces content
        fs.write("1700000000000.jpeg", b"second", Directory::Data)
            .await
            .unwrap();
        let data = fs.read("1700000000000.jpeg", Directory::Data).await.unwrap();
        assert_eq!(data, b"second");
    }

    #[tokio::test]
    async fn test_failed_write_removes_temp_file() {
        let dir = tempdir().unwrap();
        let fs = DataDirectory::new(dir.path());

        // A non-empty directory in the target's place makes the rename fail
        let blocker = dir.path().join("data").join("1.jpeg");
        std::fs::create_dir_all(blocker.join("inner")).unwrap();

        let err = fs.write("1.jpeg", b"bytes", Directory::Data).await.unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
        assert!(!dir.path().join("data").join("1.jpeg.tmp").exists());
        assert!(blocker.is_dir());
    }

    #[tokio::test]
    async fn test_data_directory_missing_file() {
        let dir = tempdir().unwrap();
        let fs = DataDirectory::new(dir.path());

        let err = fs.read("absent.jpeg", Directory::Data).await.unwrap_err();
        assert!(matches!(err, FileError::NotFound(ref name) if name == "absent.jpeg"));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let fs = DataDirectory::new(dir.path());

        for name in ["../escape.jpeg", "a/b.jpeg", "..", ""] {
            let err = fs.write(name, b"x", Directory::Data).await.unwrap_err();
            assert!(matches!(err, FileError::InvalidName(_)), "{name}");
        }
    }

    #[tokio::test]
    async fn test_memory_files() {
        let fs = MemoryFiles::new();
        assert!(fs.is_empty());

        fs.write("1.jpeg", b"one", Directory::Data).await.unwrap();
        assert_eq!(fs.len(), 1);
        assert_eq!(fs.read("1.jpeg", Directory::Data).await.unwrap(), b"one");
        assert!(fs.read("1.jpeg", Directory::Documents).await.is_err());

        assert!(fs.remove("1.jpeg", Directory::Data));
        assert!(!fs.exists("1.jpeg", Directory::Data).await.unwrap());
    }
}

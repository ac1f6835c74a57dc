//! Photo Gallery - Persistence Gateway
//!
//! Binary photo files live in a [`FileStore`]; the photo index lives in a
//! [`KeyValueStore`] as a single JSON value.

pub mod files;
pub mod kv;

pub use files::{DataDirectory, Directory, FileStore, MemoryFiles};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};

//! Object storage collaborator.
//!
//! The engine neither knows nor cares where documents live; the batch
//! driver talks to storage through this trait. All methods are
//! synchronous and blocking, matching the engine's single-threaded
//! execution model. Two implementations ship with the crate: an
//! in-memory store for tests and embedding, and a directory-backed
//! store used by the CLI.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fetch/put/delete by key against some object store.
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's content.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Store an object with a content type label.
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<()>;

    /// Delete an object. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// An object held by [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object content
    pub bytes: Vec<u8>,
    /// Content type recorded at put time
    pub content_type: String,
}

/// In-memory object store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the trait.
    pub fn insert(&self, key: impl Into<String>, bytes: Vec<u8>, content_type: impl Into<String>) {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).insert(
            key.into(),
            StoredObject {
                bytes,
                content_type: content_type.into(),
            },
        );
    }

    /// Check whether a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    /// Fetch an object with its content type, for assertions.
    pub fn get_object(&self, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.get_object(key)
            .map(|obj| obj.bytes)
            .ok_or_else(|| Error::Fetch {
                key: key.to_string(),
                message: "object not found".into(),
            })
    }

    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        self.insert(key, bytes.to_vec(), content_type);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Directory-backed object store. Keys are slash-separated relative
/// paths under the root; content types are not persisted.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> std::result::Result<PathBuf, String> {
        if key.starts_with('/') || key.split('/').any(|seg| seg == "..") {
            return Err(format!("key '{}' escapes the store root", key));
        }
        Ok(self.root.join(key))
    }
}

impl ObjectStore for DirStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key).map_err(|message| Error::Fetch {
            key: key.to_string(),
            message,
        })?;
        fs::read(&path).map_err(|e| Error::Fetch {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<()> {
        let path = self.resolve(key).map_err(|message| Error::Upload {
            key: key.to_string(),
            message,
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        }
        fs::write(&path, bytes).map_err(|e| Error::Upload {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self
            .resolve(key)
            .map_err(Error::Cleanup)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Cleanup(format!(
                "failed to delete '{}': {}",
                key, e
            ))),
        }
    }
}

//! Key-scoped persistence of in-progress form state
//!
//! [`StorageBackend`] is the raw string store (one value per key, writes
//! atomic per key). [`Persistence`] layers JSON, well-known keys and the
//! recovery policy on top: backend failures are logged and swallowed, and a
//! value that no longer parses is treated as corruption, removed, and
//! reported as absent.

use crate::error::StorageError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Raw key/value store
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Create or overwrite the value under `key`
    async fn write(&self, key: &str, value: String) -> StorageResult<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// All keys currently stored
    async fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Well-known storage slots, one per form type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    MultiStepFormData,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::MultiStepFormData => "multi-step-form-data",
        }
    }
}

/// Where the form is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    /// A user is at the keyboard; persistence is live
    #[default]
    Interactive,

    /// Pre-rendering or batch work; every persistence call is a no-op
    NonInteractive,
}

/// JSON persistence over a [`StorageBackend`]
pub struct Persistence<B> {
    backend: B,
    context: ExecutionContext,
}

impl<B: StorageBackend> Persistence<B> {
    pub fn new(backend: B) -> Self {
        Self::with_context(backend, ExecutionContext::Interactive)
    }

    pub fn with_context(backend: B, context: ExecutionContext) -> Self {
        Self { backend, context }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    fn is_live(&self) -> bool {
        self.context == ExecutionContext::Interactive
    }

    /// Serialize `value` as JSON under `key`
    pub async fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        if !self.is_live() {
            return;
        }
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize \"{}\": {}", key.as_str(), e);
                return;
            }
        };
        match self.backend.write(key.as_str(), json).await {
            Ok(()) => tracing::debug!("Persisted \"{}\"", key.as_str()),
            Err(e) => tracing::error!("Failed to write \"{}\": {}", key.as_str(), e),
        }
    }

    /// Read and parse the value under `key`.
    ///
    /// A stored value that fails to parse is removed and reported as absent.
    pub async fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        if !self.is_live() {
            return None;
        }
        let raw = match self.backend.read(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Failed to read \"{}\": {}", key.as_str(), e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    "Discarding corrupted value for \"{}\": {}",
                    key.as_str(),
                    e
                );
                self.remove(key).await;
                None
            }
        }
    }

    pub async fn remove(&self, key: StorageKey) {
        if !self.is_live() {
            return;
        }
        if let Err(e) = self.backend.delete(key.as_str()).await {
            tracing::error!("Failed to remove \"{}\": {}", key.as_str(), e);
        }
    }

    /// Remove every stored key except those listed
    pub async fn clear(&self, except: &[StorageKey]) {
        if !self.is_live() {
            return;
        }
        let keys = match self.backend.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!("Failed to list stored keys: {}", e);
                return;
            }
        };
        for key in keys {
            if except.iter().any(|kept| kept.as_str() == key) {
                continue;
            }
            if let Err(e) = self.backend.delete(&key).await {
                tracing::error!("Failed to remove \"{}\": {}", key, e);
            }
        }
    }
}

/// Directory-backed store: one `<key>.json` file per key
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its file, rejecting anything that could leave the root
    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        let safe = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

fn io_error(e: std::io::Error) -> StorageError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
        _ => StorageError::BackendError(e.to_string()),
    }
}

#[async_trait]
impl StorageBackend for FileStore {
    async fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;
        match tokio::fs::read_to_string(path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn write(&self, key: &str, value: String) -> StorageResult<()> {
        let path = self.key_path(key)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(io_error)?;

        // Temp file in the same directory, then rename, so readers never
        // observe a partial value
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, value).await.map_err(io_error)?;
        tokio::fs::rename(&temp_path, &path).await.map_err(io_error)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut read_dir = match tokio::fs::read_dir(&self.root).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(io_error)? {
            if let Some(key) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(".json"))
            {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-memory store (for tests and throwaway sessions)
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value directly, bypassing serialization
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) -> StorageResult<()> {
        self.data
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.into());
        Ok(())
    }

    /// Raw value under `key`, bypassing deserialization
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.read().ok()?.get(key).cloned()
    }
}

fn poisoned() -> StorageError {
    StorageError::BackendError("memory store lock poisoned".to_string())
}

#[async_trait]
impl StorageBackend for MemoryStore {
    async fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.read().map_err(|_| poisoned())?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> StorageResult<()> {
        self.insert_raw(key, value)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.data.write().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .data
            .read()
            .map_err(|_| poisoned())?
            .keys()
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

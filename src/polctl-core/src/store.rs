// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Key-value persistence port.
//!
//! Everything the console remembers goes through [`KvStore`]: the workspace
//! list and active workspace live in a durable store, bearer tokens in a
//! session-scoped one. Values are opaque strings; [`JsonStoreExt`] layers
//! JSON on top and treats unparsable values as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use pickledb::{PickleDb, PickleDbDumpPolicy, SerializationMethod};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write key {0}: {1}")]
    Write(String, String),

    #[error("Failed to remove key {0}: {1}")]
    Remove(String, String),

    #[error("Failed to encode value for key {0}: {1}")]
    Encode(String, String),
}

/// Minimal string key-value storage.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON helpers available on every [`KvStore`].
pub trait JsonStoreExt: KvStore {
    /// Read and decode `key`. Missing and malformed values both yield `None`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed value under '{}': {}", key, e);
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StoreError::Encode(key.to_string(), e.to_string()))?;
        self.set(key, &raw)
    }
}

impl<S: KvStore + ?Sized> JsonStoreExt for S {}

/// In-process store. Contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store on top of a JSON pickledb database.
///
/// Every mutation dumps the whole database; when the dump fails the
/// in-memory entry is rolled back so readers keep seeing what is on disk.
pub struct FileStore {
    path: PathBuf,
    db: RwLock<PickleDb>,
    private: bool,
}

impl FileStore {
    /// Open (or create) the store at `path`. A database that cannot be
    /// loaded is replaced by an empty one.
    pub fn open(path: &Path) -> Self {
        Self::open_with(path, false)
    }

    /// Like [`FileStore::open`], for secrets: on Unix the containing
    /// directory is kept at mode 0700 and the database file at 0600.
    pub fn open_private(path: &Path) -> Self {
        Self::open_with(path, true)
    }

    fn open_with(path: &Path, private: bool) -> Self {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = create_dir(parent, private) {
                warn!("Failed to prepare {}: {}", parent.display(), e);
            }
        }
        let db = if path.exists() {
            PickleDb::load(path, PickleDbDumpPolicy::DumpUponRequest, SerializationMethod::Json)
                .unwrap_or_else(|e| {
                    warn!("Discarding unreadable store {}: {}", path.display(), e);
                    PickleDb::new(path, PickleDbDumpPolicy::DumpUponRequest, SerializationMethod::Json)
                })
        } else {
            PickleDb::new(path, PickleDbDumpPolicy::DumpUponRequest, SerializationMethod::Json)
        };
        let store = Self {
            path: path.to_path_buf(),
            db: RwLock::new(db),
            private,
        };
        store.restrict_file();
        store
    }

    /// Re-apply owner-only permissions; a dump may have replaced the file.
    fn restrict_file(&self) {
        if !self.private || !self.path.exists() {
            return;
        }
        if let Err(e) = set_mode(&self.path, 0o600) {
            warn!("Failed to restrict {}: {}", self.path.display(), e);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Platform default for durable state: `~/.local/share/polctl/console.db`.
    /// Falls back to `./console.db` when the data dir is unavailable.
    pub fn durable_default_path() -> PathBuf {
        dirs::data_dir()
            .map(|p| p.join("polctl").join("console.db"))
            .unwrap_or_else(|| PathBuf::from("console.db"))
    }

    /// Platform default for session state: the per-login runtime dir
    /// (`$XDG_RUNTIME_DIR/polctl/session.db`), else the per-user cache dir,
    /// else the temp dir.
    pub fn session_default_path() -> PathBuf {
        dirs::runtime_dir()
            .or_else(dirs::cache_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("polctl")
            .join("session.db")
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let db = self.db.read().unwrap_or_else(|e| e.into_inner());
        db.get::<String>(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut db = self.db.write().unwrap_or_else(|e| e.into_inner());
        let previous = db.get::<String>(key);
        db.set(key, &value.to_string())
            .map_err(|e| StoreError::Write(key.to_string(), e.to_string()))?;
        if let Err(e) = db.dump() {
            match previous {
                Some(prev) => {
                    let _ = db.set(key, &prev);
                }
                None => {
                    let _ = db.rem(key);
                }
            }
            return Err(StoreError::Write(key.to_string(), e.to_string()));
        }
        self.restrict_file();
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut db = self.db.write().unwrap_or_else(|e| e.into_inner());
        let Some(previous) = db.get::<String>(key) else {
            return Ok(());
        };
        db.rem(key)
            .map_err(|e| StoreError::Remove(key.to_string(), e.to_string()))?;
        if let Err(e) = db.dump() {
            let _ = db.set(key, &previous);
            return Err(StoreError::Remove(key.to_string(), e.to_string()));
        }
        self.restrict_file();
        Ok(())
    }
}

#[cfg(unix)]
fn create_dir(dir: &Path, private: bool) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    if !private {
        return std::fs::create_dir_all(dir);
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)?;
    // an existing directory may have been created with looser bits
    set_mode(dir, 0o700)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path, _private: bool) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

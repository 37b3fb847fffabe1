//! Storage
//!
//! Key/value persistence for the cart and wishlist stores. Values are JSON documents.

use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors raised by a [`Storage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not read or write the entry.
    #[error("storage I/O failed for key `{key}`")]
    Io {
        /// Storage key
        key: String,

        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The entry could not be encoded or decoded.
    #[error("stored value for key `{key}` is not valid JSON for its type")]
    Json {
        /// Storage key
        key: String,

        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Keys are limited to ASCII letters, digits, `-` and `_`.
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// A string key/value store.
pub trait Storage {
    /// Read the value stored under `key`, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON document.
///
/// # Errors
///
/// Returns a [`StorageError`] if the backend fails or the document does not decode.
pub fn load_json<T: DeserializeOwned>(
    storage: &impl Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.read(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })
}

/// Encode and store a JSON document.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or the backend fails.
pub fn save_json<T: Serialize + ?Sized>(
    storage: &mut impl Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;

    storage.write(key, &raw)
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// In-memory storage. Clones share the same entries, so a test can keep a handle while a
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

/// File-backed storage writing `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store entries under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Readers only ever see a complete document.
        fs::write(&staging, value).map_err(io_err)?;
        fs::rename(&staging, &path).map_err(io_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_storage_clones_share_entries() -> TestResult {
        let handle = MemoryStorage::new();
        let mut owned = handle.clone();

        owned.write("cart", "{}")?;

        assert_eq!(handle.read("cart")?.as_deref(), Some("{}"));

        owned.remove("cart")?;
        owned.remove("cart")?;

        assert!(handle.is_empty());

        Ok(())
    }

    #[test]
    fn invalid_keys_are_rejected() {
        let storage = MemoryStorage::new();

        assert!(matches!(
            storage.read("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.read(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn file_storage_round_trips_and_treats_missing_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path().join("data"));

        assert_eq!(storage.read("wishlist")?, None);

        storage.write("wishlist", "[\"p-1\"]")?;

        assert_eq!(storage.read("wishlist")?.as_deref(), Some("[\"p-1\"]"));
        assert!(dir.path().join("data").join("wishlist.json").exists());

        storage.remove("wishlist")?;
        storage.remove("wishlist")?;

        assert_eq!(storage.read("wishlist")?, None);

        Ok(())
    }

    #[test]
    fn load_json_reports_undecodable_documents() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.write("wishlist", "not json")?;

        let result = load_json::<Vec<String>>(&storage, "wishlist");

        assert!(matches!(result, Err(StorageError::Json { .. })));

        Ok(())
    }
}

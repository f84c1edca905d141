//! Key/value persistence for the customer session.
//!
//! The session manager never talks to a file or a database directly; it reads
//! and writes through a [`KeyValueStore`] injected at construction. Reads are
//! single-key. Writes are collected in an [`EditBatch`] and committed with
//! [`KeyValueStore::apply`], which must be all-or-nothing.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: process-local, lost on exit
//! - [`FileStore`]: a JSON document on disk, replaced atomically on commit

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to persist or load stored values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or replacing the backing file failed.
    #[error("Store I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backing file does not hold a valid JSON object.
    #[error("Store contents could not be encoded or decoded: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A stored value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// A 64-bit integer, e.g. an epoch timestamp.
    Long(i64),
    /// A string.
    String(String),
}

/// One pending change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Set `key` to a value.
    Put(String, StoredValue),
    /// Delete `key`. Deleting an absent key is not an error.
    Remove(String),
}

/// Changes committed together by [`KeyValueStore::apply`].
///
/// # Example
///
/// ```rust
/// use storefront_gateway::auth::{EditBatch, KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store
///     .apply(EditBatch::new().put_string("email", "a@b.c").put_long("expires_date", 42))
///     .unwrap();
///
/// assert_eq!(store.get_long("expires_date"), Some(42));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: Vec<Edit>,
}

impl EditBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a string write.
    #[must_use]
    pub fn put_string(mut self, key: &str, value: &str) -> Self {
        self.edits.push(Edit::Put(
            key.to_string(),
            StoredValue::String(value.to_string()),
        ));
        self
    }

    /// Queues an integer write.
    #[must_use]
    pub fn put_long(mut self, key: &str, value: i64) -> Self {
        self.edits
            .push(Edit::Put(key.to_string(), StoredValue::Long(value)));
        self
    }

    /// Queues a deletion.
    #[must_use]
    pub fn remove(mut self, key: &str) -> Self {
        self.edits.push(Edit::Remove(key.to_string()));
        self
    }

    /// Returns the queued edits in order.
    #[must_use]
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    fn apply_to(self, values: &mut HashMap<String, StoredValue>) {
        for edit in self.edits {
            match edit {
                Edit::Put(key, value) => {
                    values.insert(key, value);
                }
                Edit::Remove(key) => {
                    values.remove(&key);
                }
            }
        }
    }
}

/// Persistent key/value storage.
///
/// Implementations must make [`apply`](KeyValueStore::apply) atomic: after
/// it returns, either every edit in the batch is visible or none is.
pub trait KeyValueStore: Send + Sync {
    /// Returns the string stored under `key`, if any.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Returns the integer stored under `key`, if any.
    fn get_long(&self, key: &str) -> Option<i64>;

    /// Commits `batch`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the batch could not be persisted. The store
    /// is unchanged in that case.
    fn apply(&self, batch: EditBatch) -> Result<(), StoreError>;

    /// Starts an empty batch.
    fn edit(&self) -> EditBatch {
        EditBatch::new()
    }

    /// Writes a single string.
    ///
    /// # Errors
    ///
    /// See [`apply`](KeyValueStore::apply).
    fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.apply(self.edit().put_string(key, value))
    }

    /// Writes a single integer.
    ///
    /// # Errors
    ///
    /// See [`apply`](KeyValueStore::apply).
    fn put_long(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.apply(self.edit().put_long(key, value))
    }

    /// Deletes a single key.
    ///
    /// # Errors
    ///
    /// See [`apply`](KeyValueStore::apply).
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.apply(self.edit().remove(key))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_string(&self, key: &str) -> Option<String> {
        (**self).get_string(key)
    }

    fn get_long(&self, key: &str) -> Option<i64> {
        (**self).get_long(key)
    }

    fn apply(&self, batch: EditBatch) -> Result<(), StoreError> {
        (**self).apply(batch)
    }
}

fn string_value(values: &HashMap<String, StoredValue>, key: &str) -> Option<String> {
    match values.get(key) {
        Some(StoredValue::String(value)) => Some(value.clone()),
        _ => None,
    }
}

fn long_value(values: &HashMap<String, StoredValue>, key: &str) -> Option<i64> {
    match values.get(key) {
        Some(StoredValue::Long(value)) => Some(*value),
        _ => None,
    }
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, StoredValue>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        string_value(&values, key)
    }

    fn get_long(&self, key: &str) -> Option<i64> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        long_value(&values, key)
    }

    fn apply(&self, batch: EditBatch) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        batch.apply_to(&mut values);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// Values are cached in memory. A commit writes the whole document to a
/// sibling temporary file and renames it over the target, so readers of the
/// file see either the old or the new document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<HashMap<String, StoredValue>>,
}

impl FileStore {
    /// Opens the store at `path`, loading its contents if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if an existing file cannot be read, or
    /// [`StoreError::Serialize`] if it is not a JSON object of strings and
    /// integers.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        string_value(&values, key)
    }

    fn get_long(&self, key: &str) -> Option<i64> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        long_value(&values, key)
    }

    fn apply(&self, batch: EditBatch) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = values.clone();
        batch.apply_to(&mut next);

        let document = serde_json::to_vec_pretty(&next)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, document)?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        *values = next;
        Ok(())
    }
}

// Verify stores are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MemoryStore>();
    assert_send_sync::<FileStore>();
};

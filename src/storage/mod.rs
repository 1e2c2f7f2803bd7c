//! Local key-value persistence.
//!
//! Every collection is stored as one JSON document under a fixed key and is
//! always read and written as a whole. [`Repository`] hides the format behind
//! typed keys so callers only ever see their own record types.

use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::data::account::Account;
use crate::data::content::ContentItem;
use crate::data::results::QuizResult;
use crate::data::session::Session;
use crate::error::StorageError;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Raw string storage, keyed by collection name.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Key of an ordered list collection.
pub struct ListKey<T> {
    pub name: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> ListKey<T> {
    pub const fn new(name: &'static str) -> ListKey<T> {
        ListKey {
            name,
            _record: PhantomData,
        }
    }
}

impl<T> Clone for ListKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ListKey<T> {}

/// Key of a single optional record.
pub struct RecordKey<T> {
    pub name: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> RecordKey<T> {
    pub const fn new(name: &'static str) -> RecordKey<T> {
        RecordKey {
            name,
            _record: PhantomData,
        }
    }
}

impl<T> Clone for RecordKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for RecordKey<T> {}

pub const USERS: ListKey<Account> = ListKey::new("users");
pub const CURRENT_USER: RecordKey<Session> = RecordKey::new("currentUser");
pub const UPLOADED_CONTENT: ListKey<ContentItem> = ListKey::new("uploadedContent");
pub const NOTICES: ListKey<ContentItem> = ListKey::new("notices");
pub const QUIZ_RESULTS: ListKey<QuizResult> = ListKey::new("quizResults");

pub struct Repository {
    store: Box<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    last_id: Mutex<i64>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Repository")
    }
}

impl Repository {
    pub fn new(store: impl KeyValueStore + 'static) -> Repository {
        Repository {
            store: Box::new(store),
            write_lock: Mutex::new(()),
            last_id: Mutex::new(0),
        }
    }

    pub fn in_memory() -> Repository {
        Repository::new(MemoryStore::default())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Millisecond timestamp id, strictly greater than every id handed out before.
    pub fn next_id(&self) -> Result<String, StorageError> {
        let mut last = self.last_id.lock().map_err(|_| StorageError::Poisoned)?;
        let id = Utc::now().timestamp_millis().max(*last + 1);
        *last = id;
        Ok(id.to_string())
    }

    /// Reads a whole list. Absent or unparsable values read as empty.
    pub fn list<T: DeserializeOwned>(&self, key: ListKey<T>) -> Result<Vec<T>, StorageError> {
        Ok(self.read(key.name)?.unwrap_or_default())
    }

    /// Appends one record: read everything, push, write everything back.
    pub fn push<T: Serialize + DeserializeOwned>(
        &self,
        key: ListKey<T>,
        item: T,
    ) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        let mut items: Vec<T> = self.read(key.name)?.unwrap_or_default();
        items.push(item);
        self.write(key.name, &items)
    }

    pub fn get<T: DeserializeOwned>(&self, key: RecordKey<T>) -> Result<Option<T>, StorageError> {
        self.read(key.name)
    }

    pub fn put<T: Serialize>(&self, key: RecordKey<T>, value: &T) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.write(key.name, value)
    }

    pub fn remove<T>(&self, key: RecordKey<T>) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.store.remove(key.name)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw = match self.store.get(key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!("Discarding unreadable value stored under '{}': {}", key, err);
                Ok(None)
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERS: ListKey<u32> = ListKey::new("numbers");
    const NAME: RecordKey<String> = RecordKey::new("name");

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let repo = Repository::in_memory();
        let ids: Vec<i64> = (0..200)
            .map(|_| repo.next_id().unwrap().parse().unwrap())
            .collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn absent_list_reads_as_empty() {
        let repo = Repository::in_memory();
        assert!(repo.list(NUMBERS).unwrap().is_empty());
    }

    #[test]
    fn push_appends_in_order() {
        let repo = Repository::in_memory();
        repo.push(NUMBERS, 3).unwrap();
        repo.push(NUMBERS, 1).unwrap();
        repo.push(NUMBERS, 2).unwrap();
        assert_eq!(repo.list(NUMBERS).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn corrupted_list_reads_as_empty() {
        let store = MemoryStore::default();
        store.set("numbers", "{not json").unwrap();
        let repo = Repository::new(store);

        assert!(repo.list(NUMBERS).unwrap().is_empty());
        repo.push(NUMBERS, 7).unwrap();
        assert_eq!(repo.list(NUMBERS).unwrap(), vec![7]);
    }

    #[test]
    fn structurally_wrong_record_reads_as_absent() {
        let store = MemoryStore::default();
        store.set("name", "[1, 2]").unwrap();
        let repo = Repository::new(store);
        assert_eq!(repo.get(NAME).unwrap(), None);
    }

    #[test]
    fn records_can_be_replaced_and_removed() {
        let repo = Repository::in_memory();
        repo.put(NAME, &"first".to_string()).unwrap();
        repo.put(NAME, &"second".to_string()).unwrap();
        assert_eq!(repo.get(NAME).unwrap().as_deref(), Some("second"));

        repo.remove(NAME).unwrap();
        assert_eq!(repo.get(NAME).unwrap(), None);
    }
}

use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;
use thiserror::Error;
use web_sys::{window, Storage};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("local storage is not available in this context")]
    Unavailable,
    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// String to string store scoped to the site origin.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`. Looked up on every call so that a page where storage
/// is blocked (private mode, sandboxed iframe) just yields errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<Storage, StorageError> {
        window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

thread_local! {
    // Shared by every store in this page session; never persisted.
    static SESSION_VALUES: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

/// Wraps a store with a session-wide memory copy of every value written.
///
/// Reads that fail or find nothing fall back to that copy, so two readers of
/// the same key agree even when the backing store rejects every write.
/// Write errors are still returned to the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionFallback<S> {
    inner: S,
}

impl<S: KeyValueStore> SessionFallback<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn remembered(key: &str) -> Option<String> {
        SESSION_VALUES.with(|values| values.borrow().get(key).cloned())
    }
}

impl<S: KeyValueStore> KeyValueStore for SessionFallback<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.inner.get(key) {
            Ok(Some(value)) => Ok(Some(value)),
            Ok(None) => Ok(Self::remembered(key)),
            Err(e) => {
                warn!("Reading {} from session memory: {}", key, e);
                Ok(Self::remembered(key))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        SESSION_VALUES.with(|values| {
            values.borrow_mut().insert(key.to_string(), value.to_string());
        });
        self.inner.set(key, value)
    }
}

/// Store used by the site: local storage with a session memory behind it.
pub type BrowserStorage = SessionFallback<LocalStorage>;

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_store_overwrites_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), Ok(None));

        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k"), Ok(Some("2".to_string())));
    }

    #[test]
    fn failing_store_shares_values_through_session_memory() {
        let writer = SessionFallback::new(testing::BrokenStore);
        let reader = SessionFallback::new(testing::BrokenStore);
        let key = "session_fallback_shared";

        assert_eq!(reader.get(key), Ok(None));
        assert!(writer.set(key, "1700086400000").is_err());
        assert_eq!(reader.get(key), Ok(Some("1700086400000".to_string())));
    }

    #[test]
    fn backing_store_value_wins_over_session_memory() {
        let store = SessionFallback::new(MemoryStore::new());
        let key = "session_fallback_backed";

        store.set(key, "1").unwrap();
        store.inner.set(key, "2").unwrap();
        assert_eq!(store.get(key), Ok(Some("2".to_string())));
    }

    #[test]
    fn errors_name_the_key() {
        let err = StorageError::Write {
            key: "mentoria_ia_countdown_end".to_string(),
            reason: "QuotaExceededError".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to write key mentoria_ia_countdown_end: QuotaExceededError"
        );
    }
}

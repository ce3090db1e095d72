// ============================================================================
// STORAGE - localStorage access behind a swappable backend
// ============================================================================
// Outside the browser (tests, SSR-style hosts) the handle is simply
// "unavailable" and every read returns nothing.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("localStorage is not available")]
    Unavailable,
    #[error("error reading `{0}` from localStorage")]
    Read(String),
    #[error("error writing `{0}` to localStorage")]
    Write(String),
    #[error("error removing `{0}` from localStorage")]
    Remove(String),
    #[error("error serializing `{key}`: {message}")]
    Serialize { key: String, message: String },
}

/// Synchronous string-keyed storage, shaped like `window.localStorage`
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage used on the host target
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{get_local_storage, BrowserStorage};

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{KeyValueStorage, StorageError};
    use web_sys::{window, Storage};

    pub fn get_local_storage() -> Option<Storage> {
        window()?.local_storage().ok()?
    }

    /// `window.localStorage`
    pub struct BrowserStorage {
        storage: Storage,
    }

    impl BrowserStorage {
        /// `None` when there is no window or storage access is denied
        pub fn open() -> Option<Self> {
            get_local_storage().map(|storage| Self { storage })
        }
    }

    impl KeyValueStorage for BrowserStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|_| StorageError::Read(key.to_string()))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage
                .set_item(key, value)
                .map_err(|_| StorageError::Write(key.to_string()))
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.storage
                .remove_item(key)
                .map_err(|_| StorageError::Remove(key.to_string()))
        }
    }
}

/// Cheap-to-clone handle shared by the API client and both stores
#[derive(Clone, Default)]
pub struct PersistentStorage {
    backend: Option<Rc<dyn KeyValueStorage>>,
}

impl PersistentStorage {
    pub fn new(backend: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Handle for execution contexts without storage
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn memory() -> Self {
        Self::new(Rc::new(MemoryStorage::new()))
    }

    /// Browser localStorage, or an unavailable handle if it cannot be reached
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        match BrowserStorage::open() {
            Some(storage) => Self::new(Rc::new(storage)),
            None => {
                log::warn!("⚠️ localStorage not available, state will not persist");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Raw read. Read failures are logged and reported as absent.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::error!("❌ {}", e);
                None
            }
        }
    }

    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend
            .as_ref()
            .ok_or(StorageError::Unavailable)?
            .set_item(key, value)
    }

    pub fn remove_from_storage(&self, key: &str) -> Result<(), StorageError> {
        self.backend
            .as_ref()
            .ok_or(StorageError::Unavailable)?
            .remove_item(key)
    }

    pub fn save_to_storage<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set_raw(key, &json)
    }
}

impl fmt::Debug for PersistentStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStorage")
            .field("available", &self.is_available())
            .finish()
    }
}

//! Durable client-side storage for the bearer token.

use std::cell::RefCell;

use crate::error::StorageError;

/// Holds at most one bearer token across page loads.
pub trait TokenStorage {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str) -> Result<(), StorageError>;
    fn remove(&self) -> Result<(), StorageError>;
}

/// Browser `localStorage`, keyed by [`AppConfig::token_key`](crate::config::AppConfig).
pub struct LocalTokenStorage {
    key: String,
}

impl LocalTokenStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl TokenStorage for LocalTokenStorage {
    fn load(&self) -> Option<String> {
        let storage = Self::storage().ok()?;
        storage
            .get_item(&self.key)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(&self.key, token)
            .map_err(|err| StorageError::Rejected(format!("{err:?}")))
    }

    fn remove(&self) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(&self.key)
            .map_err(|err| StorageError::Rejected(format!("{err:?}")))
    }
}

/// Process-local storage, used when the browser offers none and in tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.token.borrow_mut().take();
        Ok(())
    }
}

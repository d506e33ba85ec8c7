//! In-memory session store for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{SessionStore, SessionStoreError};

/// In-memory [`SessionStore`].
///
/// State is shared across clones, so a test can mutate the store
/// out-of-band (simulating a login or logout between sends) while the
/// client under test owns its own handle.
///
/// # Example
///
/// ```ignore
/// use claw::adapters::mock::MemorySessionStore;
/// use claw::traits::SessionStore;
///
/// let store = MemorySessionStore::with_key("sk-ant-abc");
/// assert_eq!(store.get().await?, Some("sk-ant-abc".to_string()));
///
/// store.delete().await?;
/// assert_eq!(store.get().await?, None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    key: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given key.
    pub fn with_key(key: &str) -> Self {
        Self {
            key: Arc::new(Mutex::new(Some(key.trim().to_string()))),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Result<Option<String>, SessionStoreError> {
        Ok(self
            .key
            .lock()
            .unwrap()
            .clone()
            .filter(|key| !key.is_empty()))
    }

    async fn set(&self, token: &str) -> Result<(), SessionStoreError> {
        *self.key.lock().unwrap() = Some(token.trim().to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<(), SessionStoreError> {
        *self.key.lock().unwrap() = None;
        Ok(())
    }
}

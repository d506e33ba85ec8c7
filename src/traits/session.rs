//! Session key storage trait abstraction.
//!
//! Provides a trait-based abstraction for storing the captured browser
//! session key, enabling dependency injection and mocking in tests. The key
//! never leaves the store except to be placed in an outgoing request's
//! cookie header.

use async_trait::async_trait;
use thiserror::Error;

/// Session store operation errors.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    /// Failed to read the stored key
    #[error("failed to read session key: {0}")]
    Read(String),
    /// Failed to write the key
    #[error("failed to write session key: {0}")]
    Write(String),
    /// Failed to delete the key
    #[error("failed to delete session key: {0}")]
    Delete(String),
}

/// Trait for session key storage and retrieval.
///
/// Implementations include the production file-based store and an in-memory
/// store for tests. The store may be mutated out-of-band between sends (a
/// login or logout in the host surface), so the chat client re-fetches the
/// key on every request rather than caching it.
///
/// # Example
///
/// ```ignore
/// use claw::traits::SessionStore;
///
/// async fn has_session<S: SessionStore>(store: &S) -> bool {
///     matches!(store.get().await, Ok(Some(_)))
/// }
/// ```
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the stored session key, trimmed of surrounding whitespace.
    ///
    /// Returns `Ok(None)` when no key is stored.
    async fn get(&self) -> Result<Option<String>, SessionStoreError>;

    /// Store a session key, trimming surrounding whitespace.
    async fn set(&self, token: &str) -> Result<(), SessionStoreError>;

    /// Delete the stored session key. Deleting an absent key is not an error.
    async fn delete(&self) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_store_error_display() {
        assert_eq!(
            SessionStoreError::Read("corrupt file".to_string()).to_string(),
            "failed to read session key: corrupt file"
        );
        assert_eq!(
            SessionStoreError::Write("disk full".to_string()).to_string(),
            "failed to write session key: disk full"
        );
        assert_eq!(
            SessionStoreError::Delete("permission denied".to_string()).to_string(),
            "failed to delete session key: permission denied"
        );
    }

    #[test]
    fn test_session_store_error_implements_error_trait() {
        let err = SessionStoreError::Read("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}

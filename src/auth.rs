//! Authentication
//!
//! Checkout only needs to know whether a shopper is signed in. The session
//! itself is owned elsewhere; [`StoredSession`] reads the login flag the
//! sign-in page leaves in the key-value store.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the login flag.
pub const LOGIN_STATE_KEY: &str = "isLoggedIn";

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login flag could not be updated.
    #[error("failed to update login state")]
    Storage(#[from] StorageError),
}

/// Session collaborator consulted before checkout.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Whether a shopper is currently signed in.
    fn is_authenticated(&self) -> bool;

    /// End the current session.
    async fn logout(&self) -> Result<(), AuthError>;
}

/// Session backed by the `isLoggedIn` flag in a key-value store.
#[derive(Debug, Clone)]
pub struct StoredSession<S> {
    store: S,
}

impl<S: KeyValueStore> StoredSession<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Mark the shopper as signed in.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the flag cannot be written.
    pub fn login(&self) -> Result<(), StorageError> {
        self.store.set(LOGIN_STATE_KEY, "true")?;

        info!("session started");

        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore + Send + Sync> AuthService for StoredSession<S> {
    fn is_authenticated(&self) -> bool {
        match self.store.get(LOGIN_STATE_KEY) {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(error) => {
                warn!(%error, "login state unreadable, treating as signed out");
                false
            }
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(LOGIN_STATE_KEY)?;

        info!("session ended");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::{MemoryStore, MockKeyValueStore};

    use super::*;

    #[test]
    fn signed_out_without_flag() {
        let session = StoredSession::new(MemoryStore::new());

        assert!(!session.is_authenticated());
    }

    #[test]
    fn only_the_literal_true_counts() {
        let session = StoredSession::new(MemoryStore::with_entries([(LOGIN_STATE_KEY, "yes")]));

        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_then_logout() -> TestResult {
        let session = StoredSession::new(MemoryStore::new());

        session.login()?;
        assert!(session.is_authenticated());

        session.logout().await?;
        assert!(!session.is_authenticated());

        Ok(())
    }

    #[test]
    fn unreadable_store_means_signed_out() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(StorageError::Poisoned));

        let session = StoredSession::new(store);

        assert!(!session.is_authenticated());
    }
}

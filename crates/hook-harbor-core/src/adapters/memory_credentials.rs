//! # In-Memory Credential Store
//!
//! Thread-safe in-memory implementation for testing and development.

use crate::credentials::{Credential, CredentialStore, CredentialStoreError};
use crate::InstallationId;
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Credential store backed by a `RwLock`-protected map
///
/// Uses `RwLock` for concurrent access with minimal contention. Upserts are
/// atomic by construction: the map entry is replaced under the write lock.
/// Suitable for tests and single-process development; production deployments
/// use [`FileCredentialStore`] or an external store.
///
/// [`FileCredentialStore`]: crate::adapters::FileCredentialStore
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    records: Arc<RwLock<HashMap<InstallationId, Credential>>>,
}

impl InMemoryCredentialStore {
    /// Create new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store pre-populated with credentials
    pub fn with_credentials(credentials: Vec<Credential>) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.write().unwrap();
            for credential in credentials {
                records.insert(credential.installation_id.clone(), credential);
            }
        }
        store
    }

    /// Number of stored credential records
    pub fn count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether a credential is stored for the given installation
    pub fn contains(&self, installation_id: &InstallationId) -> bool {
        self.records.read().unwrap().contains_key(installation_id)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn put(&self, credential: Credential) -> Result<(), CredentialStoreError> {
        self.records
            .write()
            .unwrap()
            .insert(credential.installation_id.clone(), credential);
        Ok(())
    }

    async fn remove(&self, installation_id: &InstallationId) -> Result<(), CredentialStoreError> {
        self.records.write().unwrap().remove(installation_id);
        Ok(())
    }

    async fn get(
        &self,
        installation_id: &InstallationId,
    ) -> Result<Option<Credential>, CredentialStoreError> {
        Ok(self.records.read().unwrap().get(installation_id).cloned())
    }
}

#[cfg(test)]
#[path = "memory_credentials_tests.rs"]
mod tests;

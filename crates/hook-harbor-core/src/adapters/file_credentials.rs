//! # Filesystem Credential Store
//!
//! Local filesystem implementation of [`CredentialStore`] for single-node
//! deployments. Stores one JSON document per installation under a base
//! directory.

use crate::credentials::{Credential, CredentialStore, CredentialStoreError};
use crate::InstallationId;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Credential store writing JSON files under a base directory
///
/// Upserts are atomic at the filesystem level: the record is written to a
/// temporary file and renamed over the final path, so a concurrent reader
/// sees either the old record or the new one, never a partial write.
///
/// # Examples
///
/// ```no_run
/// use hook_harbor_core::adapters::FileCredentialStore;
/// use std::path::PathBuf;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileCredentialStore::new(PathBuf::from("./data/credentials")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    base_path: PathBuf,
}

impl FileCredentialStore {
    /// Create new filesystem credential store
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory cannot be created or accessed.
    pub async fn new(base_path: PathBuf) -> Result<Self, CredentialStoreError> {
        fs::create_dir_all(&base_path)
            .await
            .map_err(|e| CredentialStoreError::Unavailable {
                message: format!("Failed to create base directory: {}", e),
            })?;

        Ok(Self { base_path })
    }

    /// Get record path for an installation
    ///
    /// `InstallationId` validation restricts values to `[A-Za-z0-9_-]`, so
    /// the identifier is safe to embed in a file name directly.
    fn record_path(&self, installation_id: &InstallationId) -> PathBuf {
        self.base_path
            .join(format!("{}.json", installation_id.as_str()))
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn put(&self, credential: Credential) -> Result<(), CredentialStoreError> {
        let final_path = self.record_path(&credential.installation_id);
        let temp_path = final_path.with_extension("json.tmp");

        let contents = serde_json::to_vec_pretty(&credential)?;

        let mut file =
            fs::File::create(&temp_path)
                .await
                .map_err(|e| CredentialStoreError::OperationFailed {
                    message: format!("Failed to create temporary record: {}", e),
                })?;

        file.write_all(&contents)
            .await
            .map_err(|e| CredentialStoreError::OperationFailed {
                message: format!("Failed to write record: {}", e),
            })?;

        file.flush()
            .await
            .map_err(|e| CredentialStoreError::OperationFailed {
                message: format!("Failed to flush record: {}", e),
            })?;
        drop(file);

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            CredentialStoreError::OperationFailed {
                message: format!("Failed to finalize record: {}", e),
            }
        })
    }

    async fn remove(&self, installation_id: &InstallationId) -> Result<(), CredentialStoreError> {
        match fs::remove_file(self.record_path(installation_id)).await {
            Ok(()) => Ok(()),
            // Removing an absent credential is not an error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialStoreError::OperationFailed {
                message: format!("Failed to remove record: {}", e),
            }),
        }
    }

    async fn get(
        &self,
        installation_id: &InstallationId,
    ) -> Result<Option<Credential>, CredentialStoreError> {
        match fs::read(self.record_path(installation_id)).await {
            Ok(contents) => Ok(Some(serde_json::from_slice(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CredentialStoreError::OperationFailed {
                message: format!("Failed to read record: {}", e),
            }),
        }
    }
}

#[cfg(test)]
#[path = "file_credentials_tests.rs"]
mod tests;

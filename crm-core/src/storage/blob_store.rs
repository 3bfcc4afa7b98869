//! Content-addressed blob storage
//!
//! Stores attachment bytes in memory using the SHA-256 hash as key.
//! Writing the same bytes twice yields the same hash and a single copy.

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Content-addressed blob store
#[derive(Clone, Default)]
pub struct BlobStore {
    blobs: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write data to blob store, returns SHA-256 hash
    pub async fn write(&self, data: &[u8]) -> Result<String> {
        let hash = calculate_hash(data);

        let mut blobs = self.blobs.write().await;
        if blobs.contains_key(&hash) {
            tracing::debug!("Blob already exists: {}", hash);
            return Ok(hash);
        }

        blobs.insert(hash.clone(), Arc::new(data.to_vec()));

        tracing::debug!("Wrote blob: {} ({} bytes)", hash, data.len());

        Ok(hash)
    }

    /// Read data from blob store
    pub async fn read(&self, hash: &str) -> Result<Vec<u8>> {
        let blobs = self.blobs.read().await;

        let data = blobs
            .get(hash)
            .ok_or_else(|| AppError::BlobStore(format!("Blob not found: {}", hash)))?;

        tracing::debug!("Read blob: {} ({} bytes)", hash, data.len());

        Ok(data.as_ref().clone())
    }

    /// Check if a blob exists
    pub async fn exists(&self, hash: &str) -> bool {
        self.blobs.read().await.contains_key(hash)
    }

    /// Delete a blob; deleting a missing blob is not an error
    pub async fn delete(&self, hash: &str) {
        if self.blobs.write().await.remove(hash).is_some() {
            tracing::debug!("Deleted blob: {}", hash);
        }
    }

    /// Number of stored blobs
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

/// Calculate SHA-256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let store = BlobStore::new();

        let data = b"Hello, World!";
        let hash = store.write(data).await.unwrap();

        let read_data = store.read(&hash).await.unwrap();
        assert_eq!(data, read_data.as_slice());
        assert_eq!(hash.len(), 64);
    }

    #[tokio::test]
    async fn test_hash_consistency() {
        let store = BlobStore::new();

        let hash1 = store.write(b"Test data").await.unwrap();
        let hash2 = store.write(b"Test data").await.unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let store = BlobStore::new();

        let hash = store.write(b"Delete test").await.unwrap();
        assert!(store.exists(&hash).await);
        assert!(!store.exists("nonexistent").await);

        store.delete(&hash).await;
        store.delete(&hash).await;

        assert!(!store.exists(&hash).await);
        assert!(store.read(&hash).await.is_err());
    }
}

//! Revoked token lookups.
//!
//! Token validation asks a [`RevocationStore`] whether a record exists for the
//! token id. A missing record means the token is not revoked. Store failures
//! are reported as [`StoreError`] and never read as "not revoked".

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Whether a revocation record exists for `token_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot answer.
    async fn exists(&self, token_id: &str) -> Result<bool, StoreError>;
}

/// Revocation records held in process memory.
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    revoked: RwLock<HashSet<String>>,
}

impl MemoryRevocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already revoked ids.
    pub fn with_revoked<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            revoked: RwLock::new(ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Record `token_id` as revoked. Returns `false` if it already was.
    pub async fn revoke(&self, token_id: &str) -> bool {
        let created = self.revoked.write().await.insert(token_id.to_string());
        if created {
            info!(token_id, "token revoked");
        }
        created
    }

    /// Delete the record for `token_id`. Returns `false` if there was none.
    pub async fn restore(&self, token_id: &str) -> bool {
        let removed = self.revoked.write().await.remove(token_id);
        if removed {
            info!(token_id, "token revocation removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.revoked.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn exists(&self, token_id: &str) -> Result<bool, StoreError> {
        Ok(self.revoked.read().await.contains(token_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_id_is_not_revoked() {
        let store = MemoryRevocationStore::new();
        assert!(!store.exists("jti-1").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn revoke_and_restore() {
        let store = MemoryRevocationStore::new();
        assert!(store.revoke("jti-1").await);
        assert!(!store.revoke("jti-1").await);
        assert!(store.exists("jti-1").await.unwrap());
        assert_eq!(store.len().await, 1);

        assert!(store.restore("jti-1").await);
        assert!(!store.restore("jti-1").await);
        assert!(!store.exists("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn seeded_ids_are_revoked() {
        let store = MemoryRevocationStore::with_revoked(["a", "b"]);
        assert!(store.exists("a").await.unwrap());
        assert!(store.exists("b").await.unwrap());
        assert!(!store.exists("c").await.unwrap());
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::Unavailable("connection refused".into());
        assert_eq!(err.to_string(), "revocation store unavailable: connection refused");
    }
}

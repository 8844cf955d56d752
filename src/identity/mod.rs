mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

use async_trait::async_trait;
use log::{ debug, info, warn };
use std::sync::Arc;
use uuid::Uuid;
use crate::error::ClientError;

/// Fixed storage key of the persisted user id.
pub const USER_ID_KEY: &str = "userId";

/// Durable client-side key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
}

/// Resolves the per-installation user id.
///
/// When durable storage fails the id is kept in a [`MemoryKeyValueStore`]
/// instead, so repeated lookups agree for the rest of the session.
pub struct IdentityStore {
    storage: Arc<dyn KeyValueStore>,
    fallback: MemoryKeyValueStore,
}

impl IdentityStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage, fallback: MemoryKeyValueStore::new() }
    }

    /// Returns the stored id, generating and persisting one when none exists.
    /// Storage failures never surface: the id then lives only for this session.
    pub async fn get_or_create_user_id(&self) -> String {
        match self.storage.get(USER_ID_KEY).await {
            Ok(Some(id)) if !id.trim().is_empty() => {
                return id;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Could not read stored user id, using a session-only id: {}", e);
                return self.session_only_id().await;
            }
        }

        let id = match self.fallback_id().await {
            Some(id) => id,
            None => generate_user_id(),
        };
        match self.storage.set(USER_ID_KEY, &id).await {
            Ok(()) => info!("Stored user id {}", id),
            Err(e) => {
                warn!("Could not persist user id {}, it will not survive a restart: {}", id, e);
                self.remember(&id).await;
            }
        }
        id
    }

    async fn session_only_id(&self) -> String {
        if let Some(id) = self.fallback_id().await {
            return id;
        }
        let id = generate_user_id();
        self.remember(&id).await;
        id
    }

    async fn fallback_id(&self) -> Option<String> {
        self.fallback.get(USER_ID_KEY).await.ok().flatten()
    }

    async fn remember(&self, id: &str) {
        if let Err(e) = self.fallback.set(USER_ID_KEY, id).await {
            debug!("Could not keep session-only user id: {}", e);
        }
    }
}

fn generate_user_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    struct BrokenStore {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, ClientError> {
            Err(ClientError::StorageUnavailable("disk gone".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), ClientError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::StorageUnavailable("disk gone".into()))
        }
    }

    struct ReadOnlyStore;

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, ClientError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), ClientError> {
            Err(ClientError::StorageUnavailable("read-only".into()))
        }
    }

    #[tokio::test]
    async fn resolution_is_stable_across_reloads() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let first = IdentityStore::new(storage.clone()).get_or_create_user_id().await;
        let second = IdentityStore::new(storage.clone()).get_or_create_user_id().await;
        assert_eq!(first, second);
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn existing_id_is_returned_unchanged() {
        let storage = Arc::new(MemoryKeyValueStore::with_entry(USER_ID_KEY, "stored-id"));
        let id = IdentityStore::new(storage.clone()).get_or_create_user_id().await;
        assert_eq!(id, "stored-id");
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn blank_stored_value_counts_as_absent() {
        let storage = Arc::new(MemoryKeyValueStore::with_entry(USER_ID_KEY, "  "));
        let id = IdentityStore::new(storage.clone()).get_or_create_user_id().await;
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(storage.get(USER_ID_KEY).await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn unreadable_storage_degrades_without_writing() {
        let storage = Arc::new(BrokenStore { writes: AtomicUsize::new(0) });
        let id = IdentityStore::new(storage.clone()).get_or_create_user_id().await;
        assert!(!id.is_empty());
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_write_still_yields_an_id() {
        let id = IdentityStore::new(Arc::new(ReadOnlyStore)).get_or_create_user_id().await;
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn unreadable_storage_keeps_one_id_per_session() {
        let identity = IdentityStore::new(Arc::new(BrokenStore { writes: AtomicUsize::new(0) }));
        let first = identity.get_or_create_user_id().await;
        let second = identity.get_or_create_user_id().await;
        assert_eq!(first, second);
        assert_eq!(identity.fallback.get(USER_ID_KEY).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn unwritable_storage_keeps_one_id_per_session() {
        let identity = IdentityStore::new(Arc::new(ReadOnlyStore));
        let first = identity.get_or_create_user_id().await;
        assert_eq!(identity.get_or_create_user_id().await, first);
        assert_eq!(identity.fallback.get(USER_ID_KEY).await.unwrap(), Some(first));
    }
}
